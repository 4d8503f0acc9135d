//! Reading `tailwind.config.js` modules.
//!
//! The module is parsed with SWC and the exported object literal is turned
//! into a JSON value. Only static data is understood: literals, arrays,
//! objects, top-level `const` bindings and `require("…")` calls (which become
//! the required module name). Default and namespace imports resolve to their
//! module name the same way. Functions and other dynamic expressions are
//! rejected.

use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use swc_core::common::{FileName, Globals, SourceMap, GLOBALS};
use swc_core::ecma::ast::*;
use swc_core::ecma::parser::{parse_file_as_module, EsSyntax, Syntax};

use crate::errors::{ConfigError, Result};

/// What a top-level name is bound to
enum Binding<'a> {
    /// `const`/`let`/`var` initializer
    Expr(&'a Expr),
    /// `import x from "module"` or `import * as x from "module"`
    Module(String),
}

type Bindings<'a> = HashMap<String, Binding<'a>>;

fn parse_module(content: &str, source_name: &str) -> Result<Module> {
    let source_map = SourceMap::default();
    let source_file = source_map.new_source_file(
        FileName::Custom(source_name.to_string()).into(),
        content.to_string(),
    );

    let syntax = Syntax::Es(EsSyntax {
        jsx: false,
        decorators: false,
        decorators_before_export: false,
        export_default_from: false,
        import_attributes: false,
        allow_super_outside_method: false,
        allow_return_outside_function: false,
        auto_accessors: false,
        explicit_resource_management: false,
        fn_bind: false,
    });

    GLOBALS.set(&Globals::new(), || {
        parse_file_as_module(&source_file, syntax, EsVersion::latest(), None, &mut vec![]).map_err(|e| {
            ConfigError::ParseError {
                source_name: source_name.to_string(),
                message: format!("Failed to parse JavaScript: {:?}", e),
            }
        })
    })
}

fn is_module_exports(target: &AssignTarget) -> bool {
    let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = target else {
        return false;
    };
    let is_module = matches!(&*member.obj, Expr::Ident(ident) if &*ident.sym == "module");
    let is_exports = matches!(&member.prop, MemberProp::Ident(prop) if &*prop.sym == "exports");
    is_module && is_exports
}

/// Find the exported expression and collect top-level bindings
fn find_export(module: &Module) -> (Option<&Expr>, Bindings<'_>) {
    let mut bindings = Bindings::new();
    let mut exported = None;

    for item in &module.body {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                exported = Some(&*export.expr);
            }
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                let source: &str = &import.src.value;
                for specifier in &import.specifiers {
                    let local = match specifier {
                        ImportSpecifier::Default(default) => &default.local,
                        ImportSpecifier::Namespace(namespace) => &namespace.local,
                        // Named imports are members of the module, not the module itself
                        ImportSpecifier::Named(_) => continue,
                    };
                    let name: &str = &local.sym;
                    bindings.insert(name.to_string(), Binding::Module(source.to_string()));
                }
            }
            ModuleItem::Stmt(Stmt::Expr(stmt)) => {
                if let Expr::Assign(assign) = &*stmt.expr {
                    if assign.op == AssignOp::Assign && is_module_exports(&assign.left) {
                        exported = Some(&*assign.right);
                    }
                }
            }
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => {
                for decl in &var.decls {
                    if let (Pat::Ident(binding), Some(init)) = (&decl.name, &decl.init) {
                        let name: &str = &binding.id.sym;
                        bindings.insert(name.to_string(), Binding::Expr(&**init));
                    }
                }
            }
            _ => {}
        }
    }

    (exported, bindings)
}

fn unsupported(path: &str, kind: impl Into<String>) -> ConfigError {
    ConfigError::UnsupportedExpression {
        path: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
        kind: kind.into(),
    }
}

fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Arrow(_) | Expr::Fn(_) => "function values are not evaluated".to_string(),
        Expr::Ident(ident) => {
            let name: &str = &ident.sym;
            format!("unknown identifier `{}`", name)
        }
        Expr::Member(_) => "member expressions are not evaluated".to_string(),
        Expr::Call(_) => "only require(\"…\") calls are supported".to_string(),
        Expr::Tpl(_) => "template literals with substitutions are not supported".to_string(),
        _ => "dynamic expressions are not supported".to_string(),
    }
}

fn number(value: f64, path: &str) -> Result<Value> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return Ok(Value::from(value as i64));
    }
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| unsupported(path, "non-finite number"))
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn prop_key(key: &PropName, path: &str) -> Result<String> {
    match key {
        PropName::Ident(ident) => {
            let name: &str = &ident.sym;
            Ok(name.to_string())
        }
        PropName::Str(s) => {
            let name: &str = &s.value;
            Ok(name.to_string())
        }
        PropName::Num(n) => Ok(n.value.to_string()),
        _ => Err(unsupported(path, "computed property keys are not supported")),
    }
}

fn require_target(call: &CallExpr) -> Option<String> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Ident(ident) = &**callee else {
        return None;
    };
    if &*ident.sym != "require" || call.args.len() != 1 || call.args[0].spread.is_some() {
        return None;
    }
    match &*call.args[0].expr {
        Expr::Lit(Lit::Str(s)) => {
            let name: &str = &s.value;
            Some(name.to_string())
        }
        _ => None,
    }
}

fn resolve_binding(binding: &Binding<'_>, path: &str, bindings: &Bindings<'_>, depth: usize) -> Result<Value> {
    match binding {
        Binding::Expr(expr) => to_value(expr, path, bindings, depth + 1),
        Binding::Module(source) => Ok(Value::String(source.clone())),
    }
}

fn to_value(expr: &Expr, path: &str, bindings: &Bindings<'_>, depth: usize) -> Result<Value> {
    // Guards against `const a = b; const b = a;` style cycles
    if depth > 64 {
        return Err(unsupported(path, "expression nesting too deep"));
    }

    match expr {
        Expr::Paren(paren) => to_value(&paren.expr, path, bindings, depth + 1),
        Expr::Lit(Lit::Str(s)) => {
            let text: &str = &s.value;
            Ok(Value::String(text.to_string()))
        }
        Expr::Lit(Lit::Num(n)) => number(n.value, path),
        Expr::Lit(Lit::Bool(b)) => Ok(Value::Bool(b.value)),
        Expr::Lit(Lit::Null(_)) => Ok(Value::Null),
        Expr::Unary(unary) if unary.op == UnaryOp::Minus => match &*unary.arg {
            Expr::Lit(Lit::Num(n)) => number(-n.value, path),
            other => Err(unsupported(path, describe(other))),
        },
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => {
            let mut text = String::new();
            for quasi in &tpl.quasis {
                let part: &str = match &quasi.cooked {
                    Some(cooked) => &**cooked,
                    None => &*quasi.raw,
                };
                text.push_str(part);
            }
            Ok(Value::String(text))
        }
        Expr::Array(array) => {
            let mut items = Vec::with_capacity(array.elems.len());
            for (i, elem) in array.elems.iter().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                match elem {
                    Some(ExprOrSpread { spread: None, expr }) => {
                        items.push(to_value(expr, &item_path, bindings, depth + 1)?)
                    }
                    Some(_) => return Err(unsupported(&item_path, "spread elements are not supported")),
                    None => return Err(unsupported(&item_path, "array holes are not supported")),
                }
            }
            Ok(Value::Array(items))
        }
        Expr::Object(object) => {
            let mut map = Map::new();
            for prop in &object.props {
                let PropOrSpread::Prop(prop) = prop else {
                    return Err(unsupported(path, "object spread is not supported"));
                };
                match &**prop {
                    Prop::KeyValue(kv) => {
                        let key = prop_key(&kv.key, path)?;
                        let value_path = child_path(path, &key);
                        let value = to_value(&kv.value, &value_path, bindings, depth + 1)?;
                        map.insert(key, value);
                    }
                    Prop::Shorthand(ident) => {
                        let key: &str = &ident.sym;
                        let value_path = child_path(path, key);
                        let bound = bindings
                            .get(key)
                            .ok_or_else(|| unsupported(&value_path, format!("unknown identifier `{}`", key)))?;
                        let value = resolve_binding(bound, &value_path, bindings, depth)?;
                        map.insert(key.to_string(), value);
                    }
                    Prop::Method(_) | Prop::Getter(_) | Prop::Setter(_) => {
                        return Err(unsupported(path, "function values are not evaluated"))
                    }
                    _ => return Err(unsupported(path, "unsupported property")),
                }
            }
            Ok(Value::Object(map))
        }
        Expr::Ident(ident) => {
            let name: &str = &ident.sym;
            match bindings.get(name) {
                Some(bound) => resolve_binding(bound, path, bindings, depth),
                None => Err(unsupported(path, describe(expr))),
            }
        }
        Expr::Call(call) => require_target(call)
            .map(Value::String)
            .ok_or_else(|| unsupported(path, describe(expr))),
        other => Err(unsupported(path, describe(other))),
    }
}

/// Parse a config module and return its exported object as JSON.
pub fn parse_exported_object(content: &str, source_name: &str) -> Result<Value> {
    let module = parse_module(content, source_name)?;
    let (exported, bindings) = find_export(&module);
    let exported = exported.ok_or_else(|| ConfigError::MissingExport {
        source_name: source_name.to_string(),
    })?;

    let value = to_value(exported, "", &bindings, 0)?;
    if !value.is_object() {
        return Err(ConfigError::MissingExport {
            source_name: source_name.to_string(),
        });
    }
    tracing::debug!(source = source_name, "parsed JavaScript configuration");
    Ok(value)
}
