// src/noyau/reduction.rs
//
// Réduction ("effondrement") de la chaîne d’opérateurs en un seul nombre.
//
// Principe (vol de l’opérande gauche):
// - N suivi de M qui lie plus fort: on réduit d’abord le segment qui commence à M,
//   borné par N (il s’arrête au premier opérateur qui ne lie pas plus fort que N)
// - puis on combine N; si un opérateur K (plus lâche) suit, le résultat REMPLACE
//   l’opérande gauche de K dans l’arène et on continue à K
//
// Aucune reconstruction de la chaîne: uniquement des réécritures d’index/valeurs.

use tracing::trace;

use super::arbre::{lie_plus_fort, Arbre, Noeud, NoeudBinaire};
use super::erreurs::ErreurCalcul;
use super::eval::Calculatrice;
use super::validation::Valeur;

/// Tolérance de "zéro numérique" (absolue).
pub const TOLERANCE_ZERO: f64 = 1e-8;

pub struct Reduction<'a> {
    calc: &'a Calculatrice,
    expr: &'a [char],
    arbre: Arbre,
}

impl<'a> Reduction<'a> {
    pub fn new(calc: &'a Calculatrice, expr: &'a [char], arbre: Arbre) -> Self {
        Self { calc, expr, arbre }
    }

    /// Réduit tout l’arbre.
    pub fn effondrer(mut self) -> Result<f64, ErreurCalcul> {
        let racine = self.arbre.racine;
        if self.arbre.binaire(racine).is_none() {
            return self.valeur(racine);
        }
        let (v, reste) = self.effondrer_depuis(racine, None)?;
        debug_assert!(reste.is_none());
        Ok(v)
    }

    /// Réduit le segment qui commence à l’opérateur `n`.
    ///
    /// Avec un `plancher`, s’arrête au premier opérateur qui ne lie pas plus fort que lui:
    /// renvoie alors (valeur du segment, Some(cet opérateur)).
    fn effondrer_depuis(
        &mut self,
        mut n: usize,
        plancher: Option<usize>,
    ) -> Result<(f64, Option<usize>), ErreurCalcul> {
        loop {
            if let Some(p) = plancher {
                if !self.lie_plus_fort(n, p) {
                    let g = self.gauche(n)?;
                    return Ok((self.valeur(g)?, Some(n)));
                }
            }

            // 1) tant que l’opérateur de droite lie plus fort que n, on le réduit d’abord
            while let Some(m) = self.droite_binaire(n)? {
                if !self.lie_plus_fort(m, n) {
                    break;
                }
                let (v, arret) = self.effondrer_depuis(m, Some(n))?;
                let nouvelle_droite = match arret {
                    Some(k) => {
                        let g = self.gauche(k)?;
                        self.remplacer(g, v);
                        k
                    }
                    None => self.pousser(v),
                };
                self.set_droite(n, nouvelle_droite)?;
            }

            // 2) combiner n
            let a = self.valeur(self.gauche(n)?)?;
            let (b, suivant) = match self.droite_binaire(n)? {
                Some(k) => (self.valeur(self.gauche(k)?)?, Some(k)),
                None => (self.valeur(self.droite(n)?)?, None),
            };
            let r = self.appliquer(n, a, b)?;

            // 3) K vole le résultat comme opérande gauche, ou fin du segment
            match suivant {
                Some(k) => {
                    let g = self.gauche(k)?;
                    self.remplacer(g, r);
                    n = k;
                }
                None => return Ok((r, None)),
            }
        }
    }

    fn appliquer(&self, n: usize, a: f64, b: f64) -> Result<f64, ErreurCalcul> {
        let op = self.op(n)?;
        let r = (op.entree.fonction)(a, b);
        trace!(symbole = %op.entree.symbole, a, b, r, "combinaison");
        Ok(r)
    }

    fn valeur(&self, idx: usize) -> Result<f64, ErreurCalcul> {
        match &self.arbre.noeuds[idx] {
            Noeud::Valeur(v) => v.resoudre(self.calc, self.expr),
            Noeud::Binaire(_) => Err(self.incoherence()),
        }
    }

    fn remplacer(&mut self, idx: usize, v: f64) {
        self.arbre.noeuds[idx] = Noeud::Valeur(Valeur::Constante(v));
    }

    fn pousser(&mut self, v: f64) -> usize {
        self.arbre.noeuds.push(Noeud::Valeur(Valeur::Constante(v)));
        self.arbre.noeuds.len() - 1
    }

    fn lie_plus_fort(&self, a: usize, b: usize) -> bool {
        match (self.arbre.binaire(a), self.arbre.binaire(b)) {
            (Some(a), Some(b)) => lie_plus_fort(a, b),
            _ => false,
        }
    }

    fn op(&self, n: usize) -> Result<&NoeudBinaire, ErreurCalcul> {
        self.arbre.binaire(n).ok_or_else(|| self.incoherence())
    }

    fn gauche(&self, n: usize) -> Result<usize, ErreurCalcul> {
        Ok(self.op(n)?.gauche)
    }

    fn droite(&self, n: usize) -> Result<usize, ErreurCalcul> {
        self.op(n)?.droite.ok_or_else(|| self.incoherence())
    }

    /// Index de l’opérateur à droite de `n`, s’il y en a un.
    fn droite_binaire(&self, n: usize) -> Result<Option<usize>, ErreurCalcul> {
        let d = self.droite(n)?;
        Ok(self.arbre.binaire(d).map(|_| d))
    }

    fn set_droite(&mut self, n: usize, d: usize) -> Result<(), ErreurCalcul> {
        if let Some(op) = self.arbre.binaire_mut(n) {
            op.droite = Some(d);
            return Ok(());
        }
        Err(self.incoherence())
    }

    /// Arbre mal formé: ne devrait pas arriver après validation.
    fn incoherence(&self) -> ErreurCalcul {
        ErreurCalcul::syntaxe(self.expr, 0, "arbre d’opérateurs incohérent")
    }
}

/// Zéro numérique -> 0 exact (y compris -0), +inf reste +inf exact.
pub fn ajuster_resultat(x: f64) -> f64 {
    if x.abs() <= TOLERANCE_ZERO {
        return 0.0;
    }
    if x.is_infinite() && x.is_sign_positive() {
        return f64::INFINITY;
    }
    x
}
