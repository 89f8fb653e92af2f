// src/noyau/arbre.rs
//
// Jetons typés -> chaîne d’opérateurs penchée à droite.
//
//   a+b*c            (a+b)*c           (profondeur entre crochets)
//
//    (+ [0])          (+ [1])
//   a   (* [0])      a   (* [0])
//      b   c            b   c
//
// Chaque opérateur binaire garde: profondeur de séparateurs, précédence, position.
// L’opérande gauche est toujours une valeur déjà connue; l’opérande droite est soit
// l’opérateur suivant, soit (pour le dernier) la dernière valeur.
// Les noeuds vivent dans une arène (Vec) et se désignent par index.

use super::erreurs::ErreurCalcul;
use super::registre::EntreeBinaire;
use super::validation::{JetonType, Valeur};

#[derive(Clone, Debug)]
pub struct NoeudBinaire {
    pub entree: EntreeBinaire,
    pub profondeur: usize,
    pub position: usize,
    pub gauche: usize,
    pub droite: Option<usize>,
}

#[derive(Clone, Debug)]
pub enum Noeud {
    Valeur(Valeur),
    Binaire(NoeudBinaire),
}

#[derive(Clone, Debug)]
pub struct Arbre {
    pub noeuds: Vec<Noeud>,
    pub racine: usize,
}

impl Arbre {
    pub fn binaire(&self, idx: usize) -> Option<&NoeudBinaire> {
        match &self.noeuds[idx] {
            Noeud::Binaire(b) => Some(b),
            Noeud::Valeur(_) => None,
        }
    }

    pub fn binaire_mut(&mut self, idx: usize) -> Option<&mut NoeudBinaire> {
        match &mut self.noeuds[idx] {
            Noeud::Binaire(b) => Some(b),
            Noeud::Valeur(_) => None,
        }
    }

    pub fn nb_operateurs(&self) -> usize {
        self.noeuds
            .iter()
            .filter(|n| matches!(n, Noeud::Binaire(_)))
            .count()
    }
}

/// Ordre de liaison: `a` lie plus fort que `b` ?
/// profondeur d’abord, puis précédence, puis position (gauche d’abord).
pub fn lie_plus_fort(a: &NoeudBinaire, b: &NoeudBinaire) -> bool {
    if a.profondeur != b.profondeur {
        return a.profondeur > b.profondeur;
    }
    if a.entree.precedence != b.entree.precedence {
        return a.entree.precedence > b.entree.precedence;
    }
    a.position < b.position
}

/// Une passe sur la suite validée.
pub fn construire_arbre(jetons: Vec<JetonType>, expr: &[char]) -> Result<Arbre, ErreurCalcul> {
    let mut arbre = Arbre {
        noeuds: Vec::with_capacity(jetons.len()),
        racine: 0,
    };
    let mut profondeur: usize = 0;

    let mut racine: Option<usize> = None;
    let mut dernier_op: Option<usize> = None;
    let mut derniere_valeur: Option<usize> = None;

    for (position, jeton) in jetons.into_iter().enumerate() {
        match jeton {
            JetonType::Ouvrant => profondeur += 1,
            JetonType::Fermant => profondeur = profondeur.saturating_sub(1),

            JetonType::Binaire(entree) => {
                let gauche = derniere_valeur.ok_or_else(|| {
                    ErreurCalcul::syntaxe(expr, 0, "opérateur binaire sans opérande gauche")
                })?;

                let idx = arbre.noeuds.len();
                arbre.noeuds.push(Noeud::Binaire(NoeudBinaire {
                    entree,
                    profondeur,
                    position,
                    gauche,
                    droite: None,
                }));

                match dernier_op {
                    Some(p) => {
                        if let Some(prec) = arbre.binaire_mut(p) {
                            prec.droite = Some(idx);
                        }
                    }
                    None => racine = Some(idx),
                }
                dernier_op = Some(idx);
            }

            JetonType::Valeur(v) => {
                let idx = arbre.noeuds.len();
                arbre.noeuds.push(Noeud::Valeur(v));
                derniere_valeur = Some(idx);
                if racine.is_none() {
                    racine = Some(idx);
                }
            }
        }
    }

    // dernier opérande droit = dernière valeur de la suite
    if let Some(op) = dernier_op {
        if let Some(b) = arbre.binaire_mut(op) {
            b.droite = derniere_valeur;
        }
    }

    arbre.racine = racine.ok_or_else(|| {
        ErreurCalcul::syntaxe(expr, 0, "aucune valeur dans l’expression")
    })?;

    Ok(arbre)
}

/// Dump indenté (démarche). Pour chaque opérateur dont la droite est un opérateur,
/// indique s’il lie plus fort que lui.
pub fn format_arbre(arbre: &Arbre) -> String {
    let mut out = String::new();
    format_noeud(arbre, arbre.racine, 0, &mut out);
    out
}

fn format_noeud(arbre: &Arbre, idx: usize, niveau: usize, out: &mut String) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&"  ".repeat(niveau));

    match &arbre.noeuds[idx] {
        Noeud::Valeur(v) => out.push_str(&v.to_string()),
        Noeud::Binaire(b) => {
            out.push_str(&format!(
                "{} [prof {}, préc {}, pos {}]",
                b.entree.symbole, b.profondeur, b.entree.precedence, b.position
            ));
            if let Some(m) = b.droite.and_then(|d| arbre.binaire(d)) {
                out.push_str(&format!(" lie plus fort: {}", lie_plus_fort(b, m)));
            }
            format_noeud(arbre, b.gauche, niveau + 1, out);
            if let Some(d) = b.droite {
                format_noeud(arbre, d, niveau + 1, out);
            }
        }
    }
}
