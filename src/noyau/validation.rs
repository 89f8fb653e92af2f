// src/noyau/validation.rs
//
// Validation + conversion des jetons bruts en jetons typés (une seule passe).
//
// Contrôles (le premier fautif gagne):
// - séparateurs équilibrés (jamais de niveau négatif, zéro à la fin)
// - opérateur binaire: ni en tête, ni en queue, ni deux de suite, ni juste après '('
// - pas de groupe vide "()" ni d’opérateur pendant "(1+)"
// - deux valeurs côte à côte (y compris "3(…)" ou ")(") => opérateur manquant
// - littéral: constante, sinon signe + littéral, sinon nombre+suffixe, sinon nombre
// - opérateur unaire + argument opaque => une seule valeur (AppelUnaire)

use std::fmt;

use super::erreurs::ErreurCalcul;
use super::eval::Calculatrice;
use super::jetons::{GenreJeton, JetonBrut};
use super::registre::{EntreeBinaire, FonctionUnaire, Registre};

/// Valeur d’un noeud feuille.
#[derive(Clone)]
pub enum Valeur {
    Constante(f64),
    /// Résolue paresseusement: l’argument repasse par tout le pipeline.
    AppelUnaire {
        symbole: String,
        fonction: FonctionUnaire,
        /// Argument SANS ses séparateurs extérieurs.
        argument: String,
        /// Index du premier caractère de l’argument dans l’expression englobante.
        decalage: usize,
    },
}

impl Valeur {
    /// `englobante` sert seulement à recaler les erreurs de l’argument.
    pub fn resoudre(&self, calc: &Calculatrice, englobante: &[char]) -> Result<f64, ErreurCalcul> {
        match self {
            Valeur::Constante(v) => Ok(*v),
            Valeur::AppelUnaire {
                fonction,
                argument,
                decalage,
                ..
            } => {
                let arg: Vec<char> = argument.chars().collect();
                let x = calc
                    .evaluer_chars(&arg)
                    .map_err(|e| e.dans_englobante(englobante, *decalage))?;
                Ok(fonction(x))
            }
        }
    }
}

impl fmt::Debug for Valeur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Valeur::Constante(v) => write!(f, "Constante({v})"),
            Valeur::AppelUnaire {
                symbole, argument, ..
            } => write!(f, "AppelUnaire({symbole}, {argument:?})"),
        }
    }
}

impl fmt::Display for Valeur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Valeur::Constante(v) => write!(f, "{v}"),
            Valeur::AppelUnaire {
                symbole, argument, ..
            } => write!(f, "{symbole}⟨{argument}⟩"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum JetonType {
    Ouvrant,
    Fermant,
    Binaire(EntreeBinaire),
    Valeur(Valeur),
}

/// Dernier jeton typé vu (pour les contrôles de voisinage).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dernier {
    Rien,
    Ouvrant,
    Fermant,
    Binaire,
    Valeur,
}

pub fn valider_et_convertir(
    registre: &Registre,
    jetons: Vec<JetonBrut>,
    expr: &[char],
) -> Result<Vec<JetonType>, ErreurCalcul> {
    let mut out: Vec<JetonType> = Vec::with_capacity(jetons.len());
    let mut niveau: usize = 0;
    let mut dernier = Dernier::Rien;

    let mut it = jetons.into_iter().peekable();
    while let Some(j) = it.next() {
        let err = |desc: &str| ErreurCalcul::syntaxe(expr, j.debut, desc);

        match j.genre {
            GenreJeton::Separateur if j.texte.starts_with(registre.ouvrant()) => {
                if matches!(dernier, Dernier::Valeur | Dernier::Fermant) {
                    return Err(err("opérateur manquant avant le séparateur ouvrant"));
                }
                niveau += 1;
                dernier = Dernier::Ouvrant;
                out.push(JetonType::Ouvrant);
            }

            GenreJeton::Separateur => {
                if niveau == 0 {
                    return Err(err("séparateur fermant sans ouvrant"));
                }
                match dernier {
                    Dernier::Ouvrant => return Err(err("groupe vide")),
                    Dernier::Binaire => return Err(err("opérateur binaire sans opérande droite")),
                    _ => {}
                }
                niveau -= 1;
                dernier = Dernier::Fermant;
                out.push(JetonType::Fermant);
            }

            GenreJeton::Binaire => {
                if dernier == Dernier::Binaire {
                    return Err(err("opérateurs binaires consécutifs"));
                }
                if dernier == Dernier::Rien || it.peek().is_none() {
                    return Err(err("opérateur binaire en début ou en fin d’expression"));
                }
                if dernier == Dernier::Ouvrant {
                    return Err(err("opérateur binaire sans opérande gauche"));
                }
                let entree = registre
                    .binaire(&j.texte)
                    .ok_or_else(|| err("opérateur binaire inconnu"))?;
                dernier = Dernier::Binaire;
                out.push(JetonType::Binaire(entree.clone()));
            }

            GenreJeton::Litteral => {
                verifier_place_valeur(dernier, &err)?;
                let v = resoudre_litteral(registre, &j.texte, j.debut, expr)?;
                dernier = Dernier::Valeur;
                out.push(JetonType::Valeur(Valeur::Constante(v)));
            }

            GenreJeton::Unaire => {
                verifier_place_valeur(dernier, &err)?;
                let entree = registre
                    .unaire(&j.texte)
                    .ok_or_else(|| err("opérateur unaire inconnu"))?;

                // l’argument opaque suit toujours (garanti par le tokenizer), on le consomme
                let arg = match it.next() {
                    Some(a) if a.genre == GenreJeton::Argument => a,
                    _ => return Err(err("argument manquant après l’opérateur unaire")),
                };
                let mut interieur: Vec<char> = arg.texte.chars().collect();
                interieur.pop();
                let argument: String = interieur.into_iter().skip(1).collect();

                dernier = Dernier::Valeur;
                out.push(JetonType::Valeur(Valeur::AppelUnaire {
                    symbole: entree.symbole.clone(),
                    fonction: entree.fonction.clone(),
                    argument,
                    decalage: arg.debut + 1,
                }));
            }

            GenreJeton::Argument => {
                return Err(err("argument sans opérateur unaire"));
            }
        }
    }

    if niveau != 0 {
        return Err(ErreurCalcul::syntaxe(
            expr,
            expr.len().saturating_sub(1),
            "séparateurs non équilibrés",
        ));
    }

    Ok(out)
}

fn verifier_place_valeur(
    dernier: Dernier,
    err: &impl Fn(&str) -> ErreurCalcul,
) -> Result<(), ErreurCalcul> {
    if matches!(dernier, Dernier::Valeur | Dernier::Fermant) {
        return Err(err("opérateur manquant entre deux valeurs"));
    }
    Ok(())
}

/// Ordre: constante exacte, signe, nombre+suffixe, nombre.
fn resoudre_litteral(
    registre: &Registre,
    texte: &str,
    debut: usize,
    expr: &[char],
) -> Result<f64, ErreurCalcul> {
    if let Some(v) = registre.constante(texte) {
        return Ok(v);
    }

    let chars: Vec<char> = texte.chars().collect();
    let n = chars.len();

    if n > 1 && chars[0] == registre.negation() {
        let reste: String = chars[1..].iter().collect();
        return Ok(-resoudre_litteral(registre, &reste, debut + 1, expr)?);
    }

    if n > 1 {
        if let Some(suffixe) = registre.suffixe(chars[n - 1]) {
            let prefixe: String = chars[..n - 1].iter().collect();
            let x = parse_nombre(&prefixe).ok_or_else(|| {
                ErreurCalcul::syntaxe(
                    expr,
                    debut + n - 2,
                    format!("conversion impossible: {{{prefixe}}}"),
                )
            })?;
            return Ok((suffixe.fonction)(x));
        }
    }

    parse_nombre(texte).ok_or_else(|| {
        ErreurCalcul::syntaxe(expr, debut, format!("conversion impossible: {{{texte}}}"))
    })
}

fn parse_nombre(s: &str) -> Option<f64> {
    s.parse::<f64>().ok()
}

/// Format utilitaire (démarche) : jetons typés en texte.
pub fn format_jetons_types(jetons: &[JetonType], registre: &Registre) -> String {
    jetons
        .iter()
        .map(|j| match j {
            JetonType::Ouvrant => registre.ouvrant().to_string(),
            JetonType::Fermant => registre.fermant().to_string(),
            JetonType::Binaire(e) => format!("{}ᵖ{}", e.symbole, e.precedence),
            JetonType::Valeur(v) => v.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
