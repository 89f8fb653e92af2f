// src/noyau/erreurs.rs
//
// Erreurs du noyau
// ----------------
// Trois familles seulement:
// - Configuration : table d’opérateurs invalide (fatal, pas d’évaluateur)
// - Syntaxe       : structure de l’expression invalide (index + description)
// - ExpressionVide: rien à calculer une fois espaces et séparateurs retirés
//
// Les fautes arithmétiques (division par zéro, hors domaine) ne passent PAS par ici:
// elles ressortent en inf / NaN.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ErreurCalcul {
    #[error("configuration invalide: {0}")]
    Configuration(String),

    #[error("{}", marqueur(.expression, .index, .description))]
    Syntaxe {
        /// Expression (sans espaces) dans laquelle l’erreur a été trouvée.
        expression: String,
        /// Index (en caractères) du caractère fautif.
        index: usize,
        description: String,
    },

    #[error("expression vide: entrez une expression non vide")]
    ExpressionVide,
}

impl ErreurCalcul {
    pub(crate) fn syntaxe(expression: &[char], index: usize, description: impl Into<String>) -> Self {
        ErreurCalcul::Syntaxe {
            expression: expression.iter().collect(),
            index,
            description: description.into(),
        }
    }

    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        ErreurCalcul::Configuration(msg.into())
    }

    /// Reporte une erreur trouvée dans l’argument d’un appel unaire sur l’expression
    /// englobante: l’index est décalé du début de l’argument.
    pub(crate) fn dans_englobante(self, englobante: &[char], decalage: usize) -> Self {
        match self {
            ErreurCalcul::Syntaxe {
                index, description, ..
            } => ErreurCalcul::Syntaxe {
                expression: englobante.iter().collect(),
                index: index + decalage,
                description,
            },
            autre => autre,
        }
    }
}

/// Rendu "expression + ~~~^ description" (une ligne de marqueur sous le caractère fautif).
fn marqueur(expression: &str, index: &usize, description: &str) -> String {
    format!(
        "{expression} n’est pas une expression valide\n{}^ {description}",
        "~".repeat(*index)
    )
}
