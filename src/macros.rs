// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression: literals, consts, borrowed fields
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Compile a pattern once and hand back a `&'static Regex`.
///
/// Patterns are literals written by us, so a compile failure is a bug
/// caught by the first test that touches the rule.
#[macro_export]
macro_rules! rx {
    ($pat:literal) => {{
        static RE: ::std::sync::LazyLock<::regex::Regex> =
            ::std::sync::LazyLock::new(|| ::regex::Regex::new($pat).unwrap());
        &*RE
    }};
}
