//! Basic smoke test to verify the public API is wired up.

#[test]
fn crate_compiles() {
    let _ = std::any::type_name::<countgate::GateConfig>();
    let _ = std::any::type_name::<countgate::GateError>();
    let _ = std::any::type_name::<countgate::FeatureGate>();
    let _ = std::any::type_name::<countgate::WidgetPolicy>();
}
