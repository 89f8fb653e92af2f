//! Noyau — évaluation (pipeline réel)
//!
//! texte -> sans espaces -> jetons bruts -> jetons typés -> arbre -> effondrement -> ajustement
//!
//! Remarque : un appel unaire `f(arg)` ne construit pas de sous-arbre dans l’arbre
//! englobant; `arg` repasse par tout le pipeline (récursion simple, sans état partagé).

use tracing::debug;

use super::arbre::{construire_arbre, format_arbre, Arbre};
use super::automate::Automate;
use super::erreurs::ErreurCalcul;
use super::jetons::{format_jetons, tokenize};
use super::reduction::{ajuster_resultat, Reduction};
use super::registre::{ConstructeurRegistre, Registre};
use super::validation::{format_jetons_types, valider_et_convertir};

/// Évaluateur figé : registre + automate, construits une fois, lecture seule ensuite.
/// `Send + Sync`, partageable entre évaluations indépendantes.
#[derive(Clone, Debug)]
pub struct Calculatrice {
    registre: Registre,
    automate: Automate,
}

#[derive(Default, Clone, Debug)]
pub struct DemarcheNoyau {
    pub jetons: String,
    pub types: String,
    pub arbre: String,
    pub note: String,
}

impl Calculatrice {
    /// Appelé par `ConstructeurRegistre::finaliser` (registre déjà vérifié).
    pub(crate) fn nouvelle(registre: Registre) -> Self {
        let automate = Automate::depuis_symboles(registre.symboles_operateurs());
        Self { registre, automate }
    }

    /// Table par défaut (voir `ConstructeurRegistre::basique`).
    pub fn basique() -> Self {
        // la table par défaut contient des opérateurs binaires: pas besoin de finaliser
        let b = ConstructeurRegistre::basique();
        Self::nouvelle(b.into_registre())
    }

    pub fn registre(&self) -> &Registre {
        &self.registre
    }

    pub fn automate(&self) -> &Automate {
        &self.automate
    }

    /// API publique : évalue une expression.
    pub fn evaluer(&self, expression: &str) -> Result<f64, ErreurCalcul> {
        let chars = sans_espaces(expression);
        self.evaluer_chars(&chars).inspect_err(|e| {
            debug!(expression, erreur = %e, "évaluation refusée");
        })
    }

    /// Même chose + démarche (jetons, jetons typés, arbre).
    pub fn evaluer_avec_demarche(
        &self,
        expression: &str,
    ) -> Result<(f64, DemarcheNoyau), ErreurCalcul> {
        let chars = sans_espaces(expression);
        self.demarche_chars(&chars).inspect_err(|e| {
            debug!(expression, erreur = %e, "évaluation refusée");
        })
    }

    fn demarche_chars(&self, chars: &[char]) -> Result<(f64, DemarcheNoyau), ErreurCalcul> {
        self.verifier_non_vide(chars)?;

        let jetons = tokenize(&self.registre, &self.automate, chars)?;
        let jetons_txt = format_jetons(&jetons);

        let types = valider_et_convertir(&self.registre, jetons, chars)?;
        let types_txt = format_jetons_types(&types, &self.registre);

        let arbre = construire_arbre(types, chars)?;
        let arbre_txt = format_arbre(&arbre);
        let nb_ops = arbre.nb_operateurs();

        let resultat = self.reduire(chars, arbre)?;

        let d = DemarcheNoyau {
            jetons: jetons_txt,
            types: types_txt,
            arbre: arbre_txt,
            note: format!(
                "Pipeline: jetons → validation → arbre ({nb_ops} opérateur(s)) → effondrement → ajustement."
            ),
        };
        Ok((resultat, d))
    }

    /// Pipeline complet sur une expression déjà sans espaces.
    /// Réentrant : c’est aussi le chemin des arguments d’appels unaires.
    pub(crate) fn evaluer_chars(&self, chars: &[char]) -> Result<f64, ErreurCalcul> {
        self.verifier_non_vide(chars)?;

        let jetons = tokenize(&self.registre, &self.automate, chars)?;
        debug!(jetons = %format_jetons(&jetons), "jetons");

        let types = valider_et_convertir(&self.registre, jetons, chars)?;
        let arbre = construire_arbre(types, chars)?;
        debug!(operateurs = arbre.nb_operateurs(), "arbre construit");

        self.reduire(chars, arbre)
    }

    fn reduire(&self, chars: &[char], arbre: Arbre) -> Result<f64, ErreurCalcul> {
        let brut = Reduction::new(self, chars, arbre).effondrer()?;
        let r = ajuster_resultat(brut);
        debug!(brut, resultat = r, "réduit");
        Ok(r)
    }

    /// Vide une fois espaces ET séparateurs retirés => ExpressionVide.
    fn verifier_non_vide(&self, chars: &[char]) -> Result<(), ErreurCalcul> {
        if chars.iter().all(|&c| self.registre.est_separateur(c)) {
            return Err(ErreurCalcul::ExpressionVide);
        }
        Ok(())
    }
}

fn sans_espaces(s: &str) -> Vec<char> {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
