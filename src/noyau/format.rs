// src/noyau/format.rs
//
// Affichage d’un résultat f64 (UI + démarche).
// - NaN            -> "indéfini"
// - +inf / -inf    -> "∞" / "-∞"
// - entier         -> sans décimales
// - sinon          -> au plus `chiffres` décimales, zéros finaux retirés

/// Au-delà, on laisse f64 choisir (notation scientifique via Display).
const ENTIER_MAX: f64 = 1e15;

pub fn format_resultat(x: f64, chiffres: usize) -> String {
    if x.is_nan() {
        return "indéfini".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    if x.abs() >= ENTIER_MAX {
        return format!("{x:e}");
    }
    if x.fract() == 0.0 {
        return format!("{}", x as i64);
    }

    let txt = format!("{x:.chiffres$}");
    let txt = if txt.contains('.') {
        txt.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        txt
    };

    // arrondi vers zéro affiché "-0"
    if txt == "-0" {
        "0".to_string()
    } else {
        txt
    }
}
