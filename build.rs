fn main() {
    // The ESP-IDF sysenv only exists for device builds; host-target
    // test builds have no esp-idf toolchain to forward.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
