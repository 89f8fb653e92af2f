// src/lib.rs
//
// Calculatrice modulaire : noyau réutilisable (sans UI).
// Le binaire (main.rs + app/) n’est qu’un client de ce noyau.

pub mod noyau;
