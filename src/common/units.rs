// src/common/units.rs

use rust_decimal::Decimal;

// Fator entre a unidade canônica e a de exibição.
// Só dois pares têm escala conhecida: Kg↔g e L↔ml. Qualquer outro par
// (ou unidades iguais) passa o valor adiante sem alteração.
fn scale_factor(canonical_unit: &str, display_unit: &str) -> Option<Decimal> {
    let canonical = canonical_unit.trim().to_lowercase();
    let display = display_unit.trim().to_lowercase();
    match (canonical.as_str(), display.as_str()) {
        ("kg", "g") | ("l", "ml") => Some(Decimal::from(1000)),
        _ => None,
    }
}

/// Converte um valor na unidade de exibição para a unidade canônica do item.
/// Ex: 1500 g com canônica "Kg" → 1.5.
pub fn to_canonical(value: Decimal, canonical_unit: &str, display_unit: &str) -> Decimal {
    match scale_factor(canonical_unit, display_unit) {
        Some(factor) => value / factor,
        None => value,
    }
}

/// Inversa de `to_canonical`. Ex: 1.5 Kg exibido em "g" → 1500.
pub fn to_display(value: Decimal, canonical_unit: &str, display_unit: &str) -> Decimal {
    match scale_factor(canonical_unit, display_unit) {
        Some(factor) => value * factor,
        None => value,
    }
}
