//! Noyau de calcul configurable
//!
//! Organisation interne :
//! - erreurs.rs    : ErreurCalcul (configuration / syntaxe / expression vide)
//! - registre.rs   : tables d’opérateurs + constructeur + table "basique"
//! - automate.rs   : trie des symboles (aucune / partielle / complète)
//! - jetons.rs     : découpage en jetons bruts
//! - validation.rs : contrôles + conversion en jetons typés
//! - arbre.rs      : chaîne d’opérateurs (arène) + ordre de liaison
//! - reduction.rs  : effondrement de la chaîne + ajustement du résultat
//! - eval.rs       : pipeline complet (Calculatrice)
//! - format.rs     : affichage d’un résultat

pub mod arbre;
pub mod automate;
pub mod erreurs;
pub mod eval;
pub mod format;
pub mod jetons;
pub mod reduction;
pub mod registre;
pub mod validation;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreurs::ErreurCalcul;
pub use eval::{Calculatrice, DemarcheNoyau};
pub use format::format_resultat;
pub use registre::ConstructeurRegistre;
