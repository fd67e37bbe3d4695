//! TypeScript contracts and stubs.

use std::path::{Path, PathBuf};

use autolink_spec::loader::DEFAULT_WEB_ENTRY;
use autolink_spec::{MethodDescriptor, ParamDescriptor, Platform};

use super::{
    screaming_snake, simple_class_name, ElementContract, FileRole, MethodContract, PlannedFile,
    TargetContext,
};
use crate::type_mapper::{is_unit, map_return_type, map_type};

const PLATFORM: Platform = Platform::Web;

/// Directory of the web entry file.
fn source_root(ctx: &TargetContext<'_>) -> PathBuf {
    let entry = ctx
        .manifest
        .platforms
        .web
        .as_ref()
        .and_then(|w| w.entry.as_deref())
        .unwrap_or(DEFAULT_WEB_ENTRY);
    Path::new(entry)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn param_list(params: &[ParamDescriptor]) -> String {
    params
        .iter()
        .map(|p| {
            let marker = if p.optional { "?" } else { "" };
            format!("{}{}: {}", p.name, marker, map_type(&p.type_text, PLATFORM))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Async methods keep their promise on this target.
fn return_type(method: &MethodDescriptor) -> String {
    let trimmed = method.return_type.trim();
    if is_unit(trimmed) {
        return "void".to_string();
    }
    let mapped = map_return_type(trimmed, PLATFORM);
    if trimmed.starts_with("Promise<") {
        format!("Promise<{}>", mapped)
    } else {
        mapped
    }
}

fn signature(method: &MethodDescriptor) -> String {
    format!(
        "{}({}): {}",
        method.name,
        param_list(&method.params),
        return_type(method)
    )
}

pub(super) fn method_files(ctx: &TargetContext<'_>, contract: &MethodContract<'_>) -> Vec<PlannedFile> {
    let name = contract.name();
    let spec = format!("{}Spec", name);
    let class = simple_class_name(contract.class_name);
    let root = source_root(ctx);
    let signatures: Vec<String> = contract.descriptor.methods.iter().map(signature).collect();

    // Contract
    let mut code = ctx.header();
    code.push_str(&format!(
        "\nexport const {}_{}_NAME = '{}';\n\n",
        screaming_snake(name),
        contract.kind.as_str().to_ascii_uppercase(),
        name
    ));
    code.push_str(&format!("export interface {} {{\n", spec));
    for sig in &signatures {
        code.push_str(&format!("  {};\n", sig));
    }
    code.push_str("}\n");
    let contract_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Contract,
        subject: name.to_string(),
        path: root.join("generated").join(format!("{}.ts", spec)),
        content: code,
    };

    // Stub
    let mut code = format!("import type {{ {} }} from './generated/{}';\n\n", spec, spec);
    code.push_str(&format!("export class {} implements {} {{\n", class, spec));
    for (i, (method, sig)) in contract.descriptor.methods.iter().zip(&signatures).enumerate() {
        if i > 0 {
            code.push('\n');
        }
        code.push_str(&format!("  {} {{\n", sig));
        code.push_str(&format!(
            "    throw new Error('{}.{} is not implemented');\n",
            name, method.name
        ));
        code.push_str("  }\n");
    }
    code.push_str("}\n");
    let stub_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Stub,
        subject: name.to_string(),
        path: root.join(format!("{}.ts", class)),
        content: code,
    };

    vec![contract_file, stub_file]
}

pub(super) fn element_files(ctx: &TargetContext<'_>, contract: &ElementContract<'_>) -> Vec<PlannedFile> {
    let name = contract.name();
    let spec = format!("{}Spec", name);
    let class = simple_class_name(contract.class_name);
    let root = source_root(ctx);
    let tag_constant = format!("{}_TAG_NAME", screaming_snake(name));
    let fields: Vec<String> = contract
        .descriptor
        .properties
        .iter()
        .map(|p| {
            let marker = if p.optional { "?" } else { "" };
            format!("{}{}: {}", p.name, marker, map_type(&p.type_text, PLATFORM))
        })
        .collect();

    // Contract
    let mut code = ctx.header();
    code.push_str(&format!(
        "\nexport const {}_ELEMENT_NAME = '{}';\n",
        screaming_snake(name),
        name
    ));
    code.push_str(&format!("export const {} = '{}';\n\n", tag_constant, contract.tag()));
    code.push_str(&format!("export interface {} {{\n", spec));
    for field in &fields {
        code.push_str(&format!("  {};\n", field));
    }
    code.push_str("}\n");
    let contract_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Contract,
        subject: name.to_string(),
        path: root.join("generated").join(format!("{}.ts", spec)),
        content: code,
    };

    // Stub
    let mut code = format!(
        "import {{ {}, type {} }} from './generated/{}';\n\n",
        tag_constant, spec, spec
    );
    code.push_str(&format!(
        "export class {} extends HTMLElement implements {} {{\n",
        class, spec
    ));
    code.push_str(&format!("  static readonly tag = {};\n", tag_constant));
    for (property, field) in contract.descriptor.properties.iter().zip(&fields) {
        // Required fields are assigned by the host before first render.
        let field = if property.optional {
            field.clone()
        } else {
            field.replacen(':', "!:", 1)
        };
        code.push_str(&format!("  {};\n", field));
    }
    code.push_str("}\n");
    let stub_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Stub,
        subject: name.to_string(),
        path: root.join(format!("{}.ts", class)),
        content: code,
    };

    vec![contract_file, stub_file]
}

#[cfg(test)]
mod tests {
    use super::*;
    use autolink_spec::{ElementDescriptor, ExtensionManifest, PropertyDescriptor};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_async_return_kept() {
        let method = MethodDescriptor {
            name: "load".into(),
            params: vec![ParamDescriptor {
                name: "opts".into(),
                optional: true,
                type_text: "{ deep: boolean }".into(),
            }],
            return_type: "Promise<string[]>".into(),
        };
        assert_eq!(
            signature(&method),
            "load(opts?: Record<string, unknown>): Promise<unknown[]>"
        );
    }

    #[test]
    fn test_element_files() {
        let manifest = ExtensionManifest::from_json(
            r#"{ "name": "ui", "version": "1.0.0", "platforms": { "web": { "entry": "lib/main.ts" } } }"#,
        )
        .unwrap();
        let ctx = TargetContext {
            manifest: &manifest,
            source_label: "src/index.ts",
        };
        let descriptor = ElementDescriptor {
            name: "FancyButtonProps".into(),
            element_name: "FancyButton".into(),
            tag_name: "fancy-button".into(),
            properties: vec![
                PropertyDescriptor {
                    name: "label".into(),
                    optional: false,
                    type_text: "string".into(),
                },
                PropertyDescriptor {
                    name: "disabled".into(),
                    optional: true,
                    type_text: "boolean".into(),
                },
            ],
        };
        let files = element_files(
            &ctx,
            &ElementContract {
                class_name: "FancyButton",
                descriptor: &descriptor,
            },
        );
        assert_eq!(files[0].path, PathBuf::from("lib/generated/FancyButtonSpec.ts"));
        assert!(files[0]
            .content
            .contains("export const FANCY_BUTTON_TAG_NAME = 'fancy-button';"));
        assert!(files[0].content.contains("  disabled?: boolean;\n"));
        assert!(files[1].content.contains("  label!: string;\n"));
        assert!(files[1].content.contains("  disabled?: boolean;\n"));
    }
}
