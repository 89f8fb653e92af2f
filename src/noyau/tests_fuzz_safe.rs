//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - expressions bien formées : la valeur attendue est calculée en même temps que le texte
//! - soupe de caractères : seules les erreurs de syntaxe / expression vide sont acceptées
//! - chaînes peu ou pas parenthésées : comparées à un évaluateur de référence
//!   (montée de précédence, tout associatif à gauche, '^' compris)

use std::time::{Duration, Instant};

use super::erreurs::ErreurCalcul;
use super::eval::Calculatrice;
use super::reduction::ajuster_resultat;
use super::registre::modulo;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn is_erreur_attendue(e: &ErreurCalcul, longueur: usize) -> bool {
    // Liste blanche : une entrée arbitraire ne doit jamais produire autre chose.
    match e {
        ErreurCalcul::Syntaxe { index, .. } => *index <= longueur,
        ErreurCalcul::ExpressionVide => true,
        ErreurCalcul::Configuration(_) => false,
    }
}

fn memes_valeurs(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_atom(rng: &mut Rng) -> (String, f64) {
    let n = rng.pick(10) as f64;
    match rng.pick(6) {
        0 => ("pi".to_string(), std::f64::consts::PI),
        1 => (format!("-{n}"), -n),
        2 => (format!("{n}.5"), n + 0.5),
        _ => (format!("{n}"), n),
    }
}

/// Expression totalement parenthésée + sa valeur attendue.
fn gen_expr(rng: &mut Rng, depth: usize) -> (String, f64) {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(8) {
        0 => gen_atom(rng),
        k @ 1..=4 => {
            let (a, va) = gen_expr(rng, depth - 1);
            let (b, vb) = gen_expr(rng, depth - 1);
            let (op, v) = match k {
                1 => ('+', va + vb),
                2 => ('-', va - vb),
                3 => ('*', va * vb),
                _ => ('/', va / vb),
            };
            (format!("({a}{op}{b})"), v)
        }
        5 => {
            let (a, va) = gen_expr(rng, depth - 1);
            (format!("abs({a})"), ajuster_resultat(va).abs())
        }
        6 => {
            let (a, va) = gen_expr(rng, depth - 1);
            (format!("cos({a})"), ajuster_resultat(va).cos())
        }
        _ => {
            // puissance bornée : petits exposants entiers
            let (a, va) = gen_expr(rng, depth - 1);
            let p = rng.pick(4);
            (format!("({a}^{p})"), va.powf(p as f64))
        }
    }
}

fn gen_soupe(rng: &mut Rng) -> String {
    const ALPHABET: &[&str] = &[
        "1", "2", "7", ".", "+", "-", "*", "x", "/", "%", "^", "!", "(", ")", " ", "pi", "e",
        "sin", "sqrt", "inf", "z",
    ];
    let n = 1 + rng.pick(16) as usize;
    (0..n)
        .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize])
        .collect()
}

/* ------------------------ Chaînes + évaluateur de référence ------------------------ */

#[derive(Clone, Copy, Debug)]
enum Lexeme {
    Nombre(f64),
    Op(char),
    Ouvrant,
    Fermant,
}

const OPERATEURS: [char; 6] = ['+', '-', '*', '/', '%', '^'];

fn precedence(op: char) -> u8 {
    match op {
        '+' | '-' => 0,
        '*' | '/' | '%' => 1,
        _ => 2,
    }
}

fn appliquer(op: char, a: f64, b: f64) -> f64 {
    match op {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        '/' => a / b,
        '%' => modulo(a, b),
        _ => a.powf(b),
    }
}

/// Chaîne d’opérandes (1..=6) séparés par des opérateurs; un opérande est parfois
/// lui-même une chaîne entre parenthèses.
fn gen_chaine(rng: &mut Rng, depth: usize, out: &mut Vec<Lexeme>) {
    let n = 1 + rng.pick(6);
    for k in 0..n {
        if k > 0 {
            out.push(Lexeme::Op(OPERATEURS[rng.pick(6) as usize]));
        }
        if depth > 0 && rng.pick(4) == 0 {
            out.push(Lexeme::Ouvrant);
            gen_chaine(rng, depth - 1, out);
            out.push(Lexeme::Fermant);
        } else {
            out.push(Lexeme::Nombre((1 + rng.pick(9)) as f64));
        }
    }
}

fn texte(lexemes: &[Lexeme]) -> String {
    lexemes
        .iter()
        .map(|l| match l {
            Lexeme::Nombre(x) => format!("{x}"),
            Lexeme::Op(op) => op.to_string(),
            Lexeme::Ouvrant => "(".to_string(),
            Lexeme::Fermant => ")".to_string(),
        })
        .collect()
}

/// Montée de précédence classique; `prec + 1` à droite = associatif à gauche.
fn reference(lexemes: &[Lexeme], pos: &mut usize, prec_min: u8) -> f64 {
    let mut gauche = reference_primaire(lexemes, pos);
    while let Some(&Lexeme::Op(op)) = lexemes.get(*pos) {
        let p = precedence(op);
        if p < prec_min {
            break;
        }
        *pos += 1;
        let droite = reference(lexemes, pos, p + 1);
        gauche = appliquer(op, gauche, droite);
    }
    gauche
}

fn reference_primaire(lexemes: &[Lexeme], pos: &mut usize) -> f64 {
    match lexemes[*pos] {
        Lexeme::Nombre(x) => {
            *pos += 1;
            x
        }
        Lexeme::Ouvrant => {
            *pos += 1;
            let v = reference(lexemes, pos, 0);
            assert!(matches!(lexemes[*pos], Lexeme::Fermant));
            *pos += 1;
            v
        }
        autre => panic!("lexème inattendu en tête d’opérande: {autre:?}"),
    }
}

fn evaluer_reference(lexemes: &[Lexeme]) -> f64 {
    let mut pos = 0;
    let v = reference(lexemes, &mut pos, 0);
    assert_eq!(pos, lexemes.len());
    ajuster_resultat(v)
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_expressions_bien_formees() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1500);

    let calc = Calculatrice::basique();
    let mut rng = Rng::new(0xC0FFEE_u64);

    for _ in 0..150 {
        budget(t0, max);

        let (expr, attendu) = gen_expr(&mut rng, 4);
        let attendu = ajuster_resultat(attendu);

        let v = calc
            .evaluer(&expr)
            .unwrap_or_else(|e| panic!("erreur non attendue: expr={expr:?} err={e}"));
        assert!(
            memes_valeurs(v, attendu),
            "expr={expr:?} obtenu={v} attendu={attendu}"
        );
    }
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    // Même seed => mêmes expressions => mêmes sorties
    let calc = Calculatrice::basique();
    let mut r1 = Rng::new(0xBADC0DE_u64);
    let mut r2 = r1.clone();

    for _ in 0..60 {
        budget(t0, max);

        let (e1, _) = gen_expr(&mut r1, 3);
        let (e2, _) = gen_expr(&mut r2, 3);
        assert_eq!(e1, e2);

        let a = calc.evaluer(&e1).map(f64::to_bits);
        let b = calc.evaluer(&e2).map(f64::to_bits);
        assert_eq!(a, b, "expr={e1:?}");
    }
}

#[test]
fn fuzz_safe_soupe_de_caracteres() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    let calc = Calculatrice::basique();
    let mut rng = Rng::new(0x5EED_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..400 {
        budget(t0, max);

        let expr = gen_soupe(&mut rng);
        let longueur = expr.chars().filter(|c| !c.is_whitespace()).count();
        match calc.evaluer(&expr) {
            Ok(_) => seen_ok += 1,
            Err(e) => {
                assert!(
                    is_erreur_attendue(&e, longueur),
                    "erreur non attendue: expr={expr:?} err={e:?}"
                );
                // l’affichage ne doit jamais paniquer
                let _ = e.to_string();
                seen_err += 1;
            }
        }
        if rng.coin() {
            // même entrée, même verdict
            assert_eq!(
                calc.evaluer(&expr).map(f64::to_bits),
                calc.evaluer(&expr).map(f64::to_bits)
            );
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 0, "aucun succès: fuzz trop “méchant”");
    assert!(seen_err > 10, "trop peu d’erreurs: {seen_err}");
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    let expr = somme_balancee("1/2", 800);
    let v = Calculatrice::basique()
        .evaluer(&expr)
        .unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 800*(1/2) = 400
    assert_eq!(v, 400.0);
}

#[test]
fn fuzz_safe_chaines_contre_reference() {
    let t0 = Instant::now();
    let max = Duration::from_millis(3000);

    let calc = Calculatrice::basique();
    let mut rng = Rng::new(0x0DDBA11_u64);

    // cas connus: moteur, puis référence
    for (expr, attendu) in [("1-2*3-4", -9.0), ("2^3^2", 64.0), ("1-2*3^2-4*5+6", -31.0)] {
        assert_eq!(calc.evaluer(expr).unwrap(), attendu, "{expr}");
    }
    let connu = [
        Lexeme::Nombre(1.0),
        Lexeme::Op('-'),
        Lexeme::Nombre(2.0),
        Lexeme::Op('*'),
        Lexeme::Nombre(3.0),
        Lexeme::Op('-'),
        Lexeme::Nombre(4.0),
    ];
    assert_eq!(evaluer_reference(&connu), -9.0);

    for _ in 0..2000 {
        budget(t0, max);

        let mut lexemes = Vec::new();
        gen_chaine(&mut rng, 2, &mut lexemes);
        let expr = texte(&lexemes);
        let attendu = evaluer_reference(&lexemes);

        let v = calc
            .evaluer(&expr)
            .unwrap_or_else(|e| panic!("erreur non attendue: expr={expr:?} err={e}"));
        assert!(
            memes_valeurs(v, attendu),
            "expr={expr:?} obtenu={v} attendu={attendu}"
        );
    }
}
