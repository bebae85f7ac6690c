//! Snippets appended to every generated mock.

/// Append a `NEW` constructor method for each of `interfaces` to `body`.
///
/// `NEW` lets a zero-value mock build a fresh instance from a controller.
pub(crate) fn append_helpers(mut body: String, interfaces: &[String]) -> String {
    for interface in interfaces {
        body.push_str(&new_method(interface));
    }
    body
}

fn new_method(interface: &str) -> String {
    let mock = format!("Mock{interface}");
    format!(
        "\n// NEW creates a {mock}.\nfunc (*{mock}) NEW(ctrl *gomock.Controller) *{mock} {{\n\treturn New{mock}(ctrl)\n}}\n"
    )
}
