// src/noyau/jetons.rs
//
// Découpage d’une expression (déjà sans espaces) en jetons bruts.
//
// Règles:
// - les opérateurs sont reconnus par l’automate (plus long préfixe, caractère par caractère)
// - un opérateur unaire est TOUJOURS suivi de son argument parenthésé: on le sort en deux
//   jetons (symbole, puis "(argument)" opaque, non découpé ici)
// - le caractère de négation collé à un littéral (début, ou juste après un opérateur)
//   n’est pas extrait: il reste le signe du littéral qui suit
// - tout ce qui n’est pas extrait devient un littéral (nombre, constante, nombre+suffixe)
//
// Invariant: la concaténation des textes des jetons redonne exactement l’entrée.

use super::automate::{Automate, Correspondance};
use super::erreurs::ErreurCalcul;
use super::registre::Registre;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenreJeton {
    Litteral,
    Binaire,
    Unaire,
    /// "(...)" d’un appel unaire, séparateurs compris.
    Argument,
    Separateur,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JetonBrut {
    pub genre: GenreJeton,
    pub texte: String,
    /// Index (caractères) du début du jeton dans l’expression.
    pub debut: usize,
}

impl JetonBrut {
    pub fn fin(&self) -> usize {
        self.debut + self.texte.chars().count()
    }
}

/// Ce qui a été consommé juste avant (les séparateurs ne comptent pas).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Precedent {
    Rien,
    Operateur,
    Valeur,
}

/// Morceaux extraits (ordonnés, disjoints); les trous deviennent des littéraux.
struct Decoupage<'a> {
    expr: &'a [char],
    morceaux: Vec<(usize, usize, GenreJeton)>,
}

impl<'a> Decoupage<'a> {
    fn new(expr: &'a [char]) -> Self {
        Self {
            expr,
            morceaux: Vec::new(),
        }
    }

    fn extraire(&mut self, debut: usize, fin: usize, genre: GenreJeton) {
        debug_assert!(debut < fin && fin <= self.expr.len());
        debug_assert!(
            self.morceaux.last().map_or(true, |&(_, f, _)| f <= debut),
            "morceau déjà extrait"
        );
        self.morceaux.push((debut, fin, genre));
    }

    fn en_jetons(self) -> Vec<JetonBrut> {
        let expr = self.expr;
        let jeton = |debut: usize, fin: usize, genre| JetonBrut {
            genre,
            texte: expr[debut..fin].iter().collect(),
            debut,
        };

        let mut out = Vec::with_capacity(self.morceaux.len() * 2 + 1);
        let mut fin_prec = 0;
        for (debut, fin, genre) in self.morceaux {
            if debut > fin_prec {
                out.push(jeton(fin_prec, debut, GenreJeton::Litteral));
            }
            out.push(jeton(debut, fin, genre));
            fin_prec = fin;
        }
        if fin_prec < expr.len() {
            out.push(jeton(fin_prec, expr.len(), GenreJeton::Litteral));
        }
        out
    }
}

/// Tokenize une expression sans espaces.
///
/// Erreur (Syntaxe) seulement pour un appel unaire mal enveloppé:
/// séparateur ouvrant absent, ou séparateur fermant jamais atteint.
pub fn tokenize(
    registre: &Registre,
    automate: &Automate,
    expr: &[char],
) -> Result<Vec<JetonBrut>, ErreurCalcul> {
    let mut decoupage = Decoupage::new(expr);
    let mut precedent = Precedent::Rien;

    // tampon = expr[debut_tampon..=i] tant que la correspondance est partielle
    let mut debut_tampon: Option<usize> = None;
    let mut i = 0;

    while i < expr.len() {
        let c = expr[i];
        let debut = debut_tampon.unwrap_or(i);
        let candidat = &expr[debut..=i];

        match automate.classer_chars(candidat.iter().copied()) {
            Correspondance::Partielle => {
                debut_tampon = Some(debut);
                i += 1;
            }

            Correspondance::Complete => {
                debut_tampon = None;
                let symbole: String = candidat.iter().collect();

                if registre.unaire(&symbole).is_some() {
                    let fin_arg = fin_argument(registre, expr, i + 1)?;
                    decoupage.extraire(debut, i + 1, GenreJeton::Unaire);
                    decoupage.extraire(i + 1, fin_arg, GenreJeton::Argument);
                    i = fin_arg;
                    // sin(x) est une valeur: un '-' qui suit est une soustraction
                    precedent = Precedent::Valeur;
                } else {
                    let est_signe = is_negation(registre, &symbole) && precedent != Precedent::Valeur;
                    if !est_signe {
                        decoupage.extraire(debut, i + 1, GenreJeton::Binaire);
                    }
                    precedent = Precedent::Operateur;
                    i += 1;
                }
            }

            Correspondance::Aucune => {
                if debut_tampon.take().is_some() {
                    // le tampon abandonné reste littéral; on reclasse c seul (sans avancer)
                    precedent = Precedent::Valeur;
                    continue;
                }

                if registre.est_separateur(c) {
                    decoupage.extraire(i, i + 1, GenreJeton::Separateur);
                } else {
                    precedent = Precedent::Valeur;
                }
                i += 1;
            }
        }
    }

    Ok(decoupage.en_jetons())
}

fn is_negation(registre: &Registre, symbole: &str) -> bool {
    let mut it = symbole.chars();
    it.next() == Some(registre.negation()) && it.next().is_none()
}

/// Index juste après le séparateur fermant qui referme l’argument ouvert en `ouvre`.
fn fin_argument(registre: &Registre, expr: &[char], ouvre: usize) -> Result<usize, ErreurCalcul> {
    if expr.get(ouvre) != Some(&registre.ouvrant()) {
        return Err(ErreurCalcul::syntaxe(
            expr,
            ouvre,
            format!(
                "un opérateur unaire doit être suivi de '{}'",
                registre.ouvrant()
            ),
        ));
    }

    let mut niveau = 1usize;
    let mut k = ouvre + 1;
    while k < expr.len() {
        let c = expr[k];
        if c == registre.ouvrant() {
            niveau += 1;
        } else if c == registre.fermant() {
            niveau -= 1;
            if niveau == 0 {
                return Ok(k + 1);
            }
        }
        k += 1;
    }

    Err(ErreurCalcul::syntaxe(
        expr,
        ouvre,
        format!("argument jamais refermé par '{}'", registre.fermant()),
    ))
}

/// Format utilitaire (démarche) : jetons bruts en texte.
pub fn format_jetons(jetons: &[JetonBrut]) -> String {
    jetons
        .iter()
        .map(|j| format!("[{}]", j.texte))
        .collect::<Vec<_>>()
        .join(" ")
}
