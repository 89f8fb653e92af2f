// src/noyau/registre.rs
//
// Registre des opérateurs + constructeur
// --------------------------------------
// Le registre est construit UNE fois (ConstructeurRegistre), puis figé dans une
// Calculatrice. Trois espaces de noms indépendants:
// - binaires  : symbole (multi-caractères permis) + précédence + f(a, b)
// - unaires   : symbole + f(x), toujours appelés sous la forme sym(arg)
// - suffixes  : UN caractère + f(x), collé à un littéral numérique ("5!")
// + constantes nommées + trois caractères de contrôle (négation, séparateurs).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};
use tracing::{debug, trace};

use super::erreurs::ErreurCalcul;
use super::eval::Calculatrice;

pub type FonctionBinaire = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;
pub type FonctionUnaire = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

#[derive(Clone)]
pub struct EntreeBinaire {
    pub symbole: String,
    pub precedence: i32,
    pub fonction: FonctionBinaire,
}

#[derive(Clone)]
pub struct EntreeUnaire {
    pub symbole: String,
    pub fonction: FonctionUnaire,
}

impl fmt::Debug for EntreeBinaire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntreeBinaire")
            .field("symbole", &self.symbole)
            .field("precedence", &self.precedence)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for EntreeUnaire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntreeUnaire")
            .field("symbole", &self.symbole)
            .finish_non_exhaustive()
    }
}

/// Tables figées (lecture seule après finalisation).
#[derive(Clone, Debug)]
pub struct Registre {
    binaires: HashMap<String, EntreeBinaire>,
    unaires: HashMap<String, EntreeUnaire>,
    suffixes: HashMap<char, EntreeUnaire>,
    constantes: HashMap<String, f64>,

    negation: char,
    ouvrant: char,
    fermant: char,
}

impl Default for Registre {
    fn default() -> Self {
        Self {
            binaires: HashMap::new(),
            unaires: HashMap::new(),
            suffixes: HashMap::new(),
            constantes: HashMap::new(),
            negation: '-',
            ouvrant: '(',
            fermant: ')',
        }
    }
}

impl Registre {
    pub fn binaire(&self, symbole: &str) -> Option<&EntreeBinaire> {
        self.binaires.get(symbole)
    }

    pub fn unaire(&self, symbole: &str) -> Option<&EntreeUnaire> {
        self.unaires.get(symbole)
    }

    pub fn suffixe(&self, c: char) -> Option<&EntreeUnaire> {
        self.suffixes.get(&c)
    }

    pub fn constante(&self, nom: &str) -> Option<f64> {
        self.constantes.get(nom).copied()
    }

    pub fn negation(&self) -> char {
        self.negation
    }

    pub fn ouvrant(&self) -> char {
        self.ouvrant
    }

    pub fn fermant(&self) -> char {
        self.fermant
    }

    pub fn est_separateur(&self, c: char) -> bool {
        c == self.ouvrant || c == self.fermant
    }

    /// Symboles binaires + unaires (ceux que l’automate doit reconnaître).
    pub fn symboles_operateurs(&self) -> impl Iterator<Item = &str> {
        self.binaires
            .keys()
            .chain(self.unaires.keys())
            .map(String::as_str)
    }

    /// Listes triées (pour l’UI: boutons générés depuis la table).
    pub fn noms_binaires(&self) -> Vec<&str> {
        trie(self.binaires.keys())
    }

    pub fn noms_unaires(&self) -> Vec<&str> {
        trie(self.unaires.keys())
    }

    pub fn noms_constantes(&self) -> Vec<&str> {
        trie(self.constantes.keys())
    }

    pub fn noms_suffixes(&self) -> Vec<char> {
        let mut v: Vec<char> = self.suffixes.keys().copied().collect();
        v.sort_unstable();
        v
    }

    pub(crate) fn a_des_binaires(&self) -> bool {
        !self.binaires.is_empty()
    }
}

fn trie<'a>(noms: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut v: Vec<&str> = noms.map(String::as_str).collect();
    v.sort_unstable();
    v
}

/// Un seul caractère exactement, sinon None.
fn caractere_unique(s: &str) -> Option<char> {
    let mut it = s.chars();
    match (it.next(), it.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Constructeur du registre.
///
/// Les réglages faillibles (suffixe, négation, séparateurs) renvoient l’erreur tout de
/// suite ET la mémorisent: `finaliser` la ressortira, un constructeur fautif ne donne
/// jamais de Calculatrice.
#[derive(Default)]
pub struct ConstructeurRegistre {
    registre: Registre,
    erreur: Option<ErreurCalcul>,
}

impl ConstructeurRegistre {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ajouter_binaire(
        &mut self,
        symbole: &str,
        precedence: i32,
        f: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
    ) -> &mut Self {
        trace!(symbole, precedence, "opérateur binaire");
        self.registre.binaires.insert(
            symbole.to_string(),
            EntreeBinaire {
                symbole: symbole.to_string(),
                precedence,
                fonction: Arc::new(f),
            },
        );
        self
    }

    pub fn ajouter_unaire(
        &mut self,
        symbole: &str,
        f: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> &mut Self {
        trace!(symbole, "opérateur unaire");
        self.registre.unaires.insert(
            symbole.to_string(),
            EntreeUnaire {
                symbole: symbole.to_string(),
                fonction: Arc::new(f),
            },
        );
        self
    }

    pub fn ajouter_constante(&mut self, nom: &str, valeur: f64) -> &mut Self {
        trace!(nom, valeur, "constante");
        self.registre.constantes.insert(nom.to_string(), valeur);
        self
    }

    pub fn ajouter_suffixe(
        &mut self,
        symbole: &str,
        f: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Result<&mut Self, ErreurCalcul> {
        let c = self.un_caractere(symbole, "le symbole d’un suffixe")?;
        trace!(symbole, "suffixe");
        self.registre.suffixes.insert(
            c,
            EntreeUnaire {
                symbole: symbole.to_string(),
                fonction: Arc::new(f),
            },
        );
        Ok(self)
    }

    pub fn set_negation(&mut self, symbole: &str) -> Result<&mut Self, ErreurCalcul> {
        self.registre.negation = self.un_caractere(symbole, "le caractère de négation")?;
        Ok(self)
    }

    pub fn set_separateurs(
        &mut self,
        ouvrant: &str,
        fermant: &str,
    ) -> Result<&mut Self, ErreurCalcul> {
        let o = self.un_caractere(ouvrant, "le séparateur ouvrant")?;
        let f = self.un_caractere(fermant, "le séparateur fermant")?;
        if o == f {
            let e = ErreurCalcul::configuration(format!(
                "les séparateurs doivent être distincts (reçu {ouvrant:?} deux fois)"
            ));
            self.erreur.get_or_insert_with(|| e.clone());
            return Err(e);
        }
        self.registre.ouvrant = o;
        self.registre.fermant = f;
        Ok(self)
    }

    /// Fige le registre. Échoue s’il n’y a aucun opérateur binaire ou si un réglage
    /// précédent a échoué.
    pub fn finaliser(self) -> Result<Calculatrice, ErreurCalcul> {
        if let Some(e) = self.erreur {
            debug!(erreur = %e, "finalisation refusée");
            return Err(e);
        }
        if !self.registre.a_des_binaires() {
            return Err(ErreurCalcul::configuration(
                "il faut au moins un opérateur binaire",
            ));
        }
        debug!(
            binaires = self.registre.binaires.len(),
            unaires = self.registre.unaires.len(),
            suffixes = self.registre.suffixes.len(),
            constantes = self.registre.constantes.len(),
            "registre finalisé"
        );
        Ok(Calculatrice::nouvelle(self.registre))
    }

    pub(crate) fn into_registre(self) -> Registre {
        self.registre
    }

    fn un_caractere(&mut self, symbole: &str, quoi: &str) -> Result<char, ErreurCalcul> {
        match caractere_unique(symbole) {
            Some(c) => Ok(c),
            None => {
                let e = ErreurCalcul::configuration(format!(
                    "{quoi} doit faire un seul caractère (reçu {symbole:?})"
                ));
                // le premier échec gagne
                self.erreur.get_or_insert_with(|| e.clone());
                Err(e)
            }
        }
    }

    /* ------------------------ Table par défaut ------------------------ */

    /// Calculatrice "de base": + - * x / % ^, trig, log, sqrt, abs, pi, e, eps, inf, `!`.
    pub fn basique() -> Self {
        let mut b = Self::new();

        b.ajouter_binaire("+", 0, |a, b| a + b)
            .ajouter_binaire("-", 0, |a, b| a - b)
            .ajouter_binaire("*", 1, |a, b| a * b)
            .ajouter_binaire("x", 1, |a, b| a * b)
            .ajouter_binaire("/", 1, |a, b| a / b)
            .ajouter_binaire("%", 1, modulo)
            .ajouter_binaire("^", 2, f64::powf);

        b.ajouter_unaire("sin", f64::sin)
            .ajouter_unaire("cos", f64::cos)
            .ajouter_unaire("tan", f64::tan)
            .ajouter_unaire("log", f64::ln)
            .ajouter_unaire("ln", f64::ln)
            .ajouter_unaire("asin", f64::asin)
            .ajouter_unaire("acos", f64::acos)
            .ajouter_unaire("atan", f64::atan)
            .ajouter_unaire("sqrt", f64::sqrt)
            .ajouter_unaire("abs", f64::abs);

        b.ajouter_constante("pi", std::f64::consts::PI)
            .ajouter_constante("e", std::f64::consts::E)
            .ajouter_constante("eps", 0.0)
            .ajouter_constante("inf", f64::INFINITY);

        // un seul caractère: ne peut pas échouer
        let _ = b.ajouter_suffixe("!", factorielle);

        b
    }
}

/// Modulo "plancher": le résultat prend le signe du diviseur.
pub fn modulo(a: f64, b: f64) -> f64 {
    a - b * (a / b).floor()
}

/// Au-delà, n! dépasse f64::MAX.
const FACTORIELLE_MAX: u32 = 170;

/// n! exact (big int) pour n entier >= 0, converti en f64.
/// NaN pour un argument négatif ou non entier, +inf au-delà de 170.
pub fn factorielle(x: f64) -> f64 {
    if x.is_nan() || x < 0.0 || x.fract() != 0.0 {
        return f64::NAN;
    }
    if x > FACTORIELLE_MAX as f64 {
        return f64::INFINITY;
    }

    let n = x as u32;
    let mut acc = BigUint::one();
    for k in 2..=n {
        acc *= k;
    }
    acc.to_f64().unwrap_or(f64::INFINITY)
}
