// src/noyau/automate.rs
//
// Automate préfixe (trie) sur les symboles d’opérateurs (binaires + unaires).
// Les noeuds vivent dans un Vec (arène), les enfants sont des index.

use std::collections::HashMap;

/// Résultat du classement d’une chaîne candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Correspondance {
    /// Aucun symbole ne commence par cette chaîne.
    Aucune,
    /// Préfixe strict d’au moins un symbole, sans être un symbole elle-même.
    Partielle,
    /// Symbole enregistré (qu’il soit aussi préfixe d’un plus long ou non).
    Complete,
}

#[derive(Clone, Debug, Default)]
struct NoeudTrie {
    enfants: HashMap<char, usize>,
    terminal: bool,
}

#[derive(Clone, Debug)]
pub struct Automate {
    noeuds: Vec<NoeudTrie>,
}

impl Default for Automate {
    fn default() -> Self {
        // noeud 0 = racine (chaîne vide)
        Self {
            noeuds: vec![NoeudTrie::default()],
        }
    }
}

impl Automate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depuis_symboles<'a>(symboles: impl IntoIterator<Item = &'a str>) -> Self {
        let mut a = Self::new();
        for s in symboles {
            a.inserer(s);
        }
        a
    }

    /// O(longueur du symbole).
    pub fn inserer(&mut self, symbole: &str) {
        let mut courant = 0;
        for c in symbole.chars() {
            courant = match self.noeuds[courant].enfants.get(&c) {
                Some(&suivant) => suivant,
                None => {
                    let nouveau = self.noeuds.len();
                    self.noeuds.push(NoeudTrie::default());
                    self.noeuds[courant].enfants.insert(c, nouveau);
                    nouveau
                }
            };
        }
        self.noeuds[courant].terminal = true;
    }

    pub fn classer(&self, candidat: &str) -> Correspondance {
        self.classer_chars(candidat.chars())
    }

    /// Variante sans allocation (le tokenizer travaille sur des &[char]).
    pub fn classer_chars(&self, candidat: impl IntoIterator<Item = char>) -> Correspondance {
        let mut courant = 0;
        for c in candidat {
            match self.noeuds[courant].enfants.get(&c) {
                Some(&suivant) => courant = suivant,
                None => return Correspondance::Aucune,
            }
        }

        let noeud = &self.noeuds[courant];
        if noeud.terminal {
            Correspondance::Complete
        } else if noeud.enfants.is_empty() {
            // seulement possible pour la racine d’un automate vide
            Correspondance::Aucune
        } else {
            Correspondance::Partielle
        }
    }
}
