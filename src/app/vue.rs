// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Clavier : Enter évalue, Backspace efface (quand le champ est focus)
// - Boutons générés depuis le registre de la calculatrice (opérateurs, fonctions, constantes)
// - Démarche : jetons bruts, jetons typés, chaîne d’opérateurs
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use calculatrice_modulaire::noyau::format_resultat;

use super::etat::AppCalc;

/// Libellés des boutons, copiés depuis le registre (la vue les réutilise à chaque frame).
struct Touches {
    binaires: Vec<String>,
    unaires: Vec<String>,
    constantes: Vec<String>,
    suffixes: Vec<String>,
    ouvrant: String,
    fermant: String,
}

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice modulaire");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultat(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_demarche(ui);
            });
    }

    fn touches(&self) -> Touches {
        let r = self.calc.registre();
        Touches {
            binaires: possedes(r.noms_binaires()),
            unaires: possedes(r.noms_unaires()),
            constantes: possedes(r.noms_constantes()),
            suffixes: r.noms_suffixes().into_iter().map(String::from).collect(),
            ouvrant: r.ouvrant().to_string(),
            fermant: r.fermant().to_string(),
        }
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: 1+2*3, cos(pi)^2, 5!, 3*-5")
                .id_source("entree_edit")
                .code_editor(),
        );

        // Si on a cliqué un bouton, on redonne le focus
        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && enter {
            self.eval_via_noyau();
        }

        // TextEdit gère déjà Backspace “normal”; ici on retire les noms complets ("sin(", "pi").
        let backspace = ui.input(|i| i.key_pressed(egui::Key::Backspace));
        if resp.has_focus() && backspace {
            self.backspace_entree();
        }

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            // Contrat: C = entrée seulement ; CLR = résultats seulement ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface résultat + erreur + démarche",
                Action::ClearResultats,
            );
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);

            ui.separator();

            ui.label("Décimales :");
            let mut d = self.chiffres as u32;
            let resp = ui.add(egui::DragValue::new(&mut d).speed(1).range(0..=17));
            if resp.changed() {
                self.set_chiffres(d as usize);
            }
        });

        ui.add_space(8.0);

        let touches = self.touches();

        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, &touches.ouvrant, InsertKind::Brut);
            self.bouton_insert(ui, &touches.fermant, InsertKind::Brut);
            for op in &touches.binaires {
                self.bouton_insert(ui, op, InsertKind::Op);
            }
            for s in &touches.suffixes {
                self.bouton_insert(ui, s, InsertKind::Brut);
            }

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 32.0], egui::Button::new("="));
            if eq.clicked() {
                self.eval_via_noyau();
            }
        });

        ui.horizontal_wrapped(|ui| {
            for f in &touches.unaires {
                let appel = format!("{f}{}", touches.ouvrant);
                self.bouton_nomme(ui, f, &appel);
            }
            ui.separator();
            for c in &touches.constantes {
                self.bouton_nomme(ui, c, c);
            }
        });

        ui.add_space(8.0);

        self.ui_pave_numerique(ui);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(
                ui.visuals().error_fg_color,
                egui::RichText::new(&self.erreur).monospace(),
            );
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        let negation = self.calc.registre().negation().to_string();

        egui::Grid::new("pave_numerique")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_insert(ui, "7", InsertKind::Brut);
                self.bouton_insert(ui, "8", InsertKind::Brut);
                self.bouton_insert(ui, "9", InsertKind::Brut);
                self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace);
                ui.end_row();

                self.bouton_insert(ui, "4", InsertKind::Brut);
                self.bouton_insert(ui, "5", InsertKind::Brut);
                self.bouton_insert(ui, "6", InsertKind::Brut);
                self.bouton_insert(ui, &negation, InsertKind::Brut);
                ui.end_row();

                self.bouton_insert(ui, "1", InsertKind::Brut);
                self.bouton_insert(ui, "2", InsertKind::Brut);
                self.bouton_insert(ui, "3", InsertKind::Brut);
                self.bouton_insert(ui, ".", InsertKind::Brut);
                ui.end_row();

                self.bouton_insert(ui, "0", InsertKind::Brut);
                ui.label("");
                ui.label("");
                ui.label("");
                ui.end_row();
            });
    }

    /// Backspace “intelligent” : retire d’un coup un nom connu ("sin(", "pi", etc.).
    fn backspace_entree(&mut self) {
        self.focus_entree = true;
        let avant = self.entree.trim_end().len();
        self.entree.truncate(avant);
        if self.entree.is_empty() {
            return;
        }

        let r = self.calc.registre();
        let ouvrant = r.ouvrant();
        let mut noms: Vec<String> = r
            .noms_unaires()
            .into_iter()
            .map(|f| format!("{f}{ouvrant}"))
            .chain(r.noms_constantes().into_iter().map(str::to_string))
            .chain(r.noms_binaires().into_iter().map(str::to_string))
            .collect();
        // le plus long d’abord ("asin(" avant "sin(")
        noms.sort_by_key(|n| std::cmp::Reverse(n.chars().count()));

        let coupe = noms
            .iter()
            .find(|n| self.entree.ends_with(n.as_str()))
            .map(|n| n.len())
            .or_else(|| self.entree.chars().last().map(char::len_utf8))
            .unwrap_or(0);

        let fin = self.entree.len() - coupe;
        self.entree.truncate(fin);
        let fin = self.entree.trim_end().len();
        self.entree.truncate(fin);
    }

    fn ui_resultat(&mut self, ui: &mut egui::Ui) {
        ui.label("Résultat :");
        Self::champ_monospace(ui, "resultat_out", &self.resultat, 2);
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(true)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.demarche.jetons);
                Self::champ_demarche(ui, "Jetons typés", "demarche_types", &self.demarche.types);
                Self::champ_demarche(ui, "Arbre", "demarche_arbre", &self.demarche.arbre);
                Self::champ_demarche(ui, "Note", "demarche_note", &self.demarche.note);
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 2);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    /// Fonctions et constantes : le libellé n’est pas forcément ce qu’on insère.
    fn bouton_nomme(&mut self, ui: &mut egui::Ui, label: &str, a_inserer: &str) {
        if ui.add_sized([46.0, 28.0], egui::Button::new(label)).clicked() {
            self.entree.push_str(a_inserer);
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, texte: &str, kind: InsertKind) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(texte));
        if !resp.clicked() || texte.is_empty() {
            return;
        }

        match kind {
            InsertKind::Op => {
                // les espaces sont ignorés par le noyau : purement visuel
                let fin = self.entree.trim_end().len();
                self.entree.truncate(fin);
                if !self.entree.is_empty() {
                    self.entree.push(' ');
                }
                self.entree.push_str(texte);
                self.entree.push(' ');
            }
            InsertKind::Brut => self.entree.push_str(texte),
        }

        self.focus_entree = true;
    }

    /// Évalue l’expression via le noyau, puis dépose résultat + démarche dans l’état UI.
    fn eval_via_noyau(&mut self) {
        match self.calc.evaluer_avec_demarche(&self.entree) {
            Ok((x, demarche)) => {
                let txt = format_resultat(x, self.chiffres);
                tracing::info!(entree = %self.entree, resultat = %txt, "évaluation");
                self.set_resultat(txt, demarche);
            }
            Err(e) => self.set_erreur(e.to_string()),
        }
        self.focus_entree = true;
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
}

#[derive(Clone, Copy, Debug)]
enum InsertKind {
    Brut,
    Op,
}

fn possedes(noms: Vec<&str>) -> Vec<String> {
    noms.into_iter().map(str::to_string).collect()
}
