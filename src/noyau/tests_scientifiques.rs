//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : trouver les limites sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//!
//! Notes importantes (aligné avec l’état actuel du noyau) :
//! - L’ordre de liaison est profondeur > précédence > position : à égalité, gauche d’abord,
//!   y compris pour '^' (2^3^2 = 64).
//! - Les fautes arithmétiques ne sont pas des erreurs : elles sortent en inf / NaN.
//! - Stress : la récursion suit l’imbrication des appels unaires; on reste sur des
//!   profondeurs modestes (pas de test de dépassement de pile).

use std::f64::consts::PI;
use std::time::{Duration, Instant};

use super::erreurs::ErreurCalcul;
use super::eval::Calculatrice;

fn eval_ok(expr: &str) -> f64 {
    Calculatrice::basique()
        .evaluer(expr)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_proche(expr: &str, attendu: f64) {
    let v = eval_ok(expr);
    assert!(
        (v - attendu).abs() <= 1e-9 * attendu.abs().max(1.0),
        "expr={expr:?} obtenu={v} attendu={attendu}"
    );
}

fn assert_syntaxe(expr: &str) {
    match Calculatrice::basique().evaluer(expr) {
        Err(ErreurCalcul::Syntaxe { .. }) => {}
        autre => panic!("expr={expr:?}: attendu Syntaxe, obtenu {autre:?}"),
    }
}

/// Budget global anti-gel (scientifique + safe).
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Cas de référence ------------------------ */

#[test]
fn sci_cas_de_reference() {
    assert_eq!(eval_ok("1+1"), 2.0);
    assert_eq!(eval_ok("2^8"), 256.0);
    assert_eq!(eval_ok("1*1"), eval_ok("1x1"));
    assert_eq!(eval_ok("pi"), PI);
    assert_eq!(eval_ok("1+2*3"), 7.0);
    assert_eq!(eval_ok("(1+2)*3"), 9.0);
    assert_eq!(eval_ok("cos(0)"), 1.0);
    assert_eq!(eval_ok("5!"), 120.0);
    assert_eq!(eval_ok("-5"), -5.0);
    assert_eq!(eval_ok("3-5"), -2.0);
    assert_eq!(eval_ok("3*-5"), -15.0);
}

/* ------------------------ Associativité ------------------------ */

#[test]
fn sci_gauche_a_droite_a_precedence_egale() {
    // chaînes de même précédence = pli gauche
    let nombres: [f64; 6] = [9.0, 2.0, 5.0, 1.0, 7.0, 3.0];
    for ops in [['-', '+', '-', '-', '+'], ['/', '*', '/', '%', '*']] {
        let mut expr = format!("{}", nombres[0]);
        let mut attendu = nombres[0];
        for (op, x) in ops.iter().zip(&nombres[1..]) {
            expr.push(*op);
            expr.push_str(&format!("{x}"));
            attendu = match op {
                '+' => attendu + x,
                '-' => attendu - x,
                '*' => attendu * x,
                '/' => attendu / x,
                _ => attendu - x * (attendu / x).floor(),
            };
        }
        assert_proche(&expr, attendu);
    }
}

#[test]
fn sci_puissance_gauche_a_droite() {
    assert_eq!(eval_ok("2^3^2"), 64.0);
    assert_eq!(eval_ok("2^(3^2)"), 512.0);
}

/* ------------------------ Séparateurs ------------------------ */

#[test]
fn sci_separateurs_desequilibres_toujours_refuses() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    for n in 1..12 {
        budget(t0, max);
        let ouvrants = "(".repeat(n);
        let fermants = ")".repeat(n);

        // un de trop d’un côté ou de l’autre
        assert_syntaxe(&format!("{ouvrants}(1+2{fermants}"));
        assert_syntaxe(&format!("{ouvrants}1+2{fermants})"));
        assert_syntaxe(&format!("1+{ouvrants}2{fermants})*3"));

        // équilibré : OK
        assert_eq!(eval_ok(&format!("{ouvrants}1+2{fermants}")), 3.0);
    }
}

#[test]
fn sci_parentheses_redondantes_neutres() {
    assert_eq!(eval_ok("((1))+((2))*((3))"), 7.0);
    assert_eq!(eval_ok("(((1+2)))*3"), 9.0);
}

/* ------------------------ Trig ------------------------ */

#[test]
fn sci_trig_zeros_ajustes() {
    for k in -4..=4 {
        assert_eq!(eval_ok(&format!("sin({k}*pi)")), 0.0, "k={k}");
        assert_eq!(eval_ok(&format!("tan({k}*pi)")), 0.0, "k={k}");
    }
    assert_eq!(eval_ok("cos(pi/2)"), 0.0);
}

#[test]
fn sci_trig_symetrie_et_periodicite() {
    for x in ["0.3", "1", "2.5", "pi/7"] {
        let s = eval_ok(&format!("sin({x})"));
        assert_proche(&format!("sin(-1*{x})"), -s);
        assert_proche(&format!("sin({x}+2*pi)"), s);
        let c = eval_ok(&format!("cos({x})"));
        assert_proche(&format!("sin({x})^2+cos({x})^2"), 1.0);
        assert_proche(&format!("cos(-1*{x})"), c);
    }
}

#[test]
fn sci_reciproques() {
    assert_proche("asin(sin(0.5))", 0.5);
    assert_proche("acos(cos(0.5))", 0.5);
    assert_proche("atan(tan(0.5))", 0.5);
    assert_proche("sqrt(2)^2", 2.0);
    assert_proche("ln(e^3)", 3.0);
}

/* ------------------------ Imbrication ------------------------ */

#[test]
fn sci_imbrication_unaire_moderee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    // abs(abs(...abs(-3)...)) : une récursion du pipeline par niveau
    for n in [1usize, 5, 20, 50] {
        budget(t0, max);
        let expr = format!("{}-3{}", "abs(".repeat(n), ")".repeat(n));
        assert_eq!(eval_ok(&expr), 3.0, "n={n}");
    }

    // sin(cos(0)) composé
    assert_eq!(eval_ok("sin(cos(0))"), 1f64.sin());
}

#[test]
fn sci_longue_chaine_plate() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    let n = 500;
    let expr = vec!["1"; n].join("+");
    assert_eq!(eval_ok(&expr), n as f64);

    let expr = format!("{}*2", vec!["1"; n].join("-"));
    // 1 - 1 - ... - 1*2  (le dernier terme est doublé)
    assert_eq!(eval_ok(&expr), 1.0 - (n as f64 - 2.0) - 2.0);

    budget(t0, max);
}
