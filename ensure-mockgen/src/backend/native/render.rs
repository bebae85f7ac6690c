//! Renders gomock-compatible mocks from interface declarations.

use std::collections::BTreeMap;

use super::{
    code::CodeBuilder,
    reader::{Interface, Method},
};

const GOMOCK_IMPORT: &str = "github.com/golang/mock/gomock";

/// Render a complete mock file.
///
/// `imports` maps the import paths referenced by the interfaces' types to the
/// name they must be imported as, if it differs from the default.
pub(crate) fn render_mock(
    mock_package: &str,
    imports: &BTreeMap<String, Option<String>>,
    interfaces: &[Interface],
) -> String {
    let mut imports = imports.clone();
    imports.insert(GOMOCK_IMPORT.to_string(), None);
    if interfaces.iter().any(|iface| !iface.methods.is_empty()) {
        imports.insert("reflect".to_string(), None);
    }

    let mut b = CodeBuilder::new();
    b.push_line("// Code generated by ensure. DO NOT EDIT.")
        .push_blank()
        .push_line(&format!("package {mock_package}"))
        .push_blank();
    render_imports(&mut b, &imports);

    for iface in interfaces {
        b.push_blank();
        render_interface(&mut b, iface);
    }
    b.build()
}

/// Standard library imports first, then everything else.
fn render_imports(b: &mut CodeBuilder, imports: &BTreeMap<String, Option<String>>) {
    let (standard, external): (Vec<_>, Vec<_>) = imports
        .iter()
        .partition(|(path, _)| !path.split('/').next().unwrap_or_default().contains('.'));

    b.push_line("import (").push_indent();
    for (index, group) in [standard, external].iter().filter(|g| !g.is_empty()).enumerate() {
        if index > 0 {
            b.push_blank();
        }
        for (path, alias) in group {
            match alias {
                Some(alias) => b.push_line(&format!("{alias} \"{path}\"")),
                None => b.push_line(&format!("\"{path}\"")),
            };
        }
    }
    b.push_dedent().push_line(")");
}

fn render_interface(b: &mut CodeBuilder, iface: &Interface) {
    let mock = format!("Mock{}", iface.name);
    let recorder = format!("{mock}MockRecorder");

    b.push_line(&format!("// {mock} is a mock of the {} interface.", iface.name))
        .push_block(&format!("type {mock} struct {{"), |b| {
            b.push_line("ctrl     *gomock.Controller")
                .push_line(&format!("recorder *{recorder}"));
        })
        .push_blank();

    b.push_line(&format!("// {recorder} is the mock recorder for {mock}."))
        .push_block(&format!("type {recorder} struct {{"), |b| {
            b.push_line(&format!("mock *{mock}"));
        })
        .push_blank();

    b.push_line(&format!("// New{mock} creates a new mock instance."))
        .push_block(
            &format!("func New{mock}(ctrl *gomock.Controller) *{mock} {{"),
            |b| {
                b.push_line(&format!("mock := &{mock}{{ctrl: ctrl}}"))
                    .push_line(&format!("mock.recorder = &{recorder}{{mock: mock}}"))
                    .push_line("return mock");
            },
        )
        .push_blank();

    b.push_line("// EXPECT returns an object that allows the caller to indicate expected use.")
        .push_block(&format!("func (m *{mock}) EXPECT() *{recorder} {{"), |b| {
            b.push_line("return m.recorder");
        });

    for method in &iface.methods {
        let names = param_names(method);
        b.push_blank();
        render_method(b, &mock, method, &names);
        b.push_blank();
        render_recorder_method(b, &mock, &recorder, method, &names);
    }
}

fn render_method(b: &mut CodeBuilder, mock: &str, method: &Method, names: &[String]) {
    let name = &method.name;
    let params: Vec<String> = method
        .params
        .iter()
        .zip(names)
        .enumerate()
        .map(|(index, (param, param_name))| {
            if method.variadic && index + 1 == names.len() {
                format!("{param_name} ...{}", param.ty)
            } else {
                format!("{param_name} {}", param.ty)
            }
        })
        .collect();

    let results: Vec<&str> = method.results.iter().map(|r| r.ty.as_str()).collect();
    let results = match results.as_slice() {
        [] => String::new(),
        [single] => format!(" {single}"),
        many => format!(" ({})", many.join(", ")),
    };

    b.push_line(&format!("// {name} mocks base method."))
        .push_block(
            &format!("func (m *{mock}) {name}({}){results} {{", params.join(", ")),
            |b| {
                b.push_line("m.ctrl.T.Helper()");

                let call_args = match names.split_last() {
                    Some((last, fixed)) if method.variadic => {
                        b.push_line(&format!("varargs := []interface{{}}{{{}}}", fixed.join(", ")))
                            .push_block(&format!("for _, a := range {last} {{"), |b| {
                                b.push_line("varargs = append(varargs, a)");
                            });
                        ", varargs...".to_string()
                    }
                    _ => names.iter().map(|n| format!(", {n}")).collect(),
                };
                let call = format!("m.ctrl.Call(m, \"{name}\"{call_args})");

                if method.results.is_empty() {
                    b.push_line(&call);
                    return;
                }

                b.push_line(&format!("ret := {call}"));
                for (index, result) in method.results.iter().enumerate() {
                    b.push_line(&format!("ret{index}, _ := ret[{index}].({})", result.ty));
                }
                let rets: Vec<String> = (0..method.results.len())
                    .map(|index| format!("ret{index}"))
                    .collect();
                b.push_line(&format!("return {}", rets.join(", ")));
            },
        );
}

fn render_recorder_method(
    b: &mut CodeBuilder,
    mock: &str,
    recorder: &str,
    method: &Method,
    names: &[String],
) {
    let name = &method.name;
    let params: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(index, param_name)| {
            if method.variadic && index + 1 == names.len() {
                format!("{param_name} ...interface{{}}")
            } else {
                format!("{param_name} interface{{}}")
            }
        })
        .collect();

    b.push_line(&format!("// {name} indicates an expected call of {name}."))
        .push_block(
            &format!(
                "func (mr *{recorder}) {name}({}) *gomock.Call {{",
                params.join(", ")
            ),
            |b| {
                b.push_line("mr.mock.ctrl.T.Helper()");

                let call_args = match names.split_last() {
                    Some((last, fixed)) if method.variadic => {
                        b.push_line(&format!(
                            "varargs := append([]interface{{}}{{{}}}, {last}...)",
                            fixed.join(", ")
                        ));
                        ", varargs...".to_string()
                    }
                    _ => names.iter().map(|n| format!(", {n}")).collect(),
                };
                b.push_line(&format!(
                    "return mr.mock.ctrl.RecordCallWithMethodType(mr.mock, \"{name}\", reflect.TypeOf((*{mock})(nil).{name}){call_args})"
                ));
            },
        );
}

/// Local names for a method's parameters: `_<name>`, or `_arg<i>` when unnamed.
fn param_names(method: &Method) -> Vec<String> {
    method
        .params
        .iter()
        .enumerate()
        .map(|(index, param)| match param.name.as_deref() {
            Some(name) if name != "_" => format!("_{name}"),
            _ => format!("_arg{index}"),
        })
        .collect()
}
