//! Kotlin contracts and stubs.

use std::collections::BTreeSet;
use std::path::PathBuf;

use autolink_spec::loader::DEFAULT_ANDROID_SOURCE_DIR;
use autolink_spec::{MethodDescriptor, ParamDescriptor, Platform};

use super::{
    simple_class_name, upper_first, BindingKind, ElementContract, FileRole, MethodContract,
    PlannedFile, TargetContext,
};
use crate::error::{CodegenError, CodegenResult};
use crate::type_mapper::{is_unit, map_optional_type, map_return_type, map_type};

const PLATFORM: Platform = Platform::Android;

fn package_name<'a>(ctx: &TargetContext<'a>) -> CodegenResult<&'a str> {
    ctx.manifest
        .platforms
        .android
        .as_ref()
        .map(|a| a.package_name.as_str())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| CodegenError::MissingPackageName {
            extension: ctx.manifest.name.clone(),
        })
}

fn source_dir(ctx: &TargetContext<'_>) -> PathBuf {
    let dir = ctx
        .manifest
        .platforms
        .android
        .as_ref()
        .and_then(|a| a.source_dir.as_deref())
        .unwrap_or(DEFAULT_ANDROID_SOURCE_DIR);
    PathBuf::from(dir)
}

fn package_path(package: &str) -> PathBuf {
    package.split('.').collect()
}

/// Package and path of a stub class. A qualified class name picks its own
/// package.
fn stub_location(ctx: &TargetContext<'_>, package: &str, class_name: &str) -> (String, PathBuf) {
    let simple = simple_class_name(class_name);
    let stub_package = match class_name.rsplit_once('.') {
        Some((prefix, _)) => prefix.to_string(),
        None => package.to_string(),
    };
    let path = source_dir(ctx)
        .join(package_path(&stub_package))
        .join(format!("{}.kt", simple));
    (stub_package, path)
}

fn param_list(params: &[ParamDescriptor]) -> String {
    params
        .iter()
        .map(|p| {
            let ty = if p.optional {
                map_optional_type(&p.type_text, PLATFORM)
            } else {
                map_type(&p.type_text, PLATFORM)
            };
            format!("{}: {}", p.name, ty)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn signature(method: &MethodDescriptor) -> String {
    let params = param_list(&method.params);
    if is_unit(&method.return_type) {
        format!("fun {}({})", method.name, params)
    } else {
        format!(
            "fun {}({}): {}",
            method.name,
            params,
            map_return_type(&method.return_type, PLATFORM)
        )
    }
}

fn property_type(optional: bool, type_text: &str) -> String {
    if optional {
        map_optional_type(type_text, PLATFORM)
    } else {
        map_type(type_text, PLATFORM)
    }
}

/// Bridge imports needed by rendered signatures.
fn bridge_imports(signatures: &[String]) -> BTreeSet<&'static str> {
    let mut imports = BTreeSet::new();
    for (ty, import) in [
        ("Callback", "com.lynx.react.bridge.Callback"),
        ("ReadableArray", "com.lynx.react.bridge.ReadableArray"),
        ("ReadableMap", "com.lynx.react.bridge.ReadableMap"),
    ] {
        if signatures.iter().any(|s| s.contains(ty)) {
            imports.insert(import);
        }
    }
    imports
}

fn push_imports(code: &mut String, imports: &BTreeSet<String>) {
    for import in imports {
        code.push_str(&format!("import {}\n", import));
    }
}

pub(super) fn method_files(
    ctx: &TargetContext<'_>,
    contract: &MethodContract<'_>,
) -> CodegenResult<Vec<PlannedFile>> {
    let package = package_name(ctx)?;
    let name = contract.name();
    let spec = format!("{}Spec", name);
    let signatures: Vec<String> = contract.descriptor.methods.iter().map(signature).collect();
    let bridge = bridge_imports(&signatures);

    // Contract
    let mut code = ctx.header();
    code.push_str(&format!("package {}.generated\n\n", package));
    let mut imports: BTreeSet<String> = bridge.iter().map(|s| s.to_string()).collect();
    if contract.kind == BindingKind::Module {
        imports.insert("com.lynx.jsbridge.LynxMethod".to_string());
    }
    push_imports(&mut code, &imports);
    if !imports.is_empty() {
        code.push('\n');
    }
    code.push_str(&format!("interface {} {{\n", spec));
    code.push_str("    companion object {\n");
    code.push_str(&format!("        const val NAME = \"{}\"\n", name));
    code.push_str("    }\n");
    for sig in &signatures {
        code.push('\n');
        if contract.kind == BindingKind::Module {
            code.push_str("    @LynxMethod\n");
        }
        code.push_str(&format!("    {}\n", sig));
    }
    code.push_str("}\n");
    let contract_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Contract,
        subject: name.to_string(),
        path: source_dir(ctx)
            .join(package_path(package))
            .join("generated")
            .join(format!("{}.kt", spec)),
        content: code,
    };

    // Stub
    let (stub_package, stub_path) = stub_location(ctx, package, contract.class_name);
    let class = simple_class_name(contract.class_name);
    let mut code = format!("package {}\n\n", stub_package);
    let mut imports: BTreeSet<String> = bridge.iter().map(|s| s.to_string()).collect();
    imports.insert("android.content.Context".to_string());
    imports.insert(format!("{}.generated.{}", package, spec));
    let supertypes = match contract.kind {
        BindingKind::Module => {
            imports.insert("com.lynx.jsbridge.LynxModule".to_string());
            format!("LynxModule(context), {}", spec)
        }
        BindingKind::Service => spec.clone(),
    };
    push_imports(&mut code, &imports);
    let ctor = match contract.kind {
        BindingKind::Module => "context: Context",
        BindingKind::Service => "private val context: Context",
    };
    code.push_str(&format!("\nclass {}({}) : {} {{\n", class, ctor, supertypes));
    for (i, (method, sig)) in contract.descriptor.methods.iter().zip(&signatures).enumerate() {
        if i > 0 {
            code.push('\n');
        }
        code.push_str(&format!("    override {} {{\n", sig));
        code.push_str(&format!(
            "        TODO(\"{}.{} is not implemented\")\n",
            name, method.name
        ));
        code.push_str("    }\n");
    }
    code.push_str("}\n");
    let stub_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Stub,
        subject: name.to_string(),
        path: stub_path,
        content: code,
    };

    Ok(vec![contract_file, stub_file])
}

pub(super) fn element_files(
    ctx: &TargetContext<'_>,
    contract: &ElementContract<'_>,
) -> CodegenResult<Vec<PlannedFile>> {
    let package = package_name(ctx)?;
    let name = contract.name();
    let spec = format!("{}Spec", name);
    let setters: Vec<String> = contract
        .descriptor
        .properties
        .iter()
        .map(|p| {
            format!(
                "fun set{}(value: {})",
                upper_first(&p.name),
                property_type(p.optional, &p.type_text)
            )
        })
        .collect();
    let bridge = bridge_imports(&setters);

    // Contract
    let mut code = ctx.header();
    code.push_str(&format!("package {}.generated\n\n", package));
    let imports: BTreeSet<String> = bridge.iter().map(|s| s.to_string()).collect();
    push_imports(&mut code, &imports);
    if !imports.is_empty() {
        code.push('\n');
    }
    code.push_str(&format!("interface {} {{\n", spec));
    code.push_str("    companion object {\n");
    code.push_str(&format!("        const val NAME = \"{}\"\n", name));
    code.push_str(&format!("        const val TAG_NAME = \"{}\"\n", contract.tag()));
    code.push_str("    }\n");
    for setter in &setters {
        code.push('\n');
        code.push_str(&format!("    {}\n", setter));
    }
    code.push_str("}\n");
    let contract_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Contract,
        subject: name.to_string(),
        path: source_dir(ctx)
            .join(package_path(package))
            .join("generated")
            .join(format!("{}.kt", spec)),
        content: code,
    };

    // Stub
    let (stub_package, stub_path) = stub_location(ctx, package, contract.class_name);
    let class = simple_class_name(contract.class_name);
    let mut code = format!("package {}\n\n", stub_package);
    let mut imports: BTreeSet<String> = bridge.iter().map(|s| s.to_string()).collect();
    for import in [
        "android.content.Context",
        "android.view.View",
        "com.lynx.tasm.behavior.LynxContext",
        "com.lynx.tasm.behavior.LynxProp",
        "com.lynx.tasm.behavior.ui.LynxUI",
    ] {
        imports.insert(import.to_string());
    }
    imports.insert(format!("{}.generated.{}", package, spec));
    push_imports(&mut code, &imports);
    code.push_str(&format!(
        "\nclass {}(context: LynxContext) : LynxUI<View>(context), {} {{\n",
        class, spec
    ));
    code.push_str("    override fun createView(context: Context): View = View(context)\n");
    for (property, setter) in contract.descriptor.properties.iter().zip(&setters) {
        code.push('\n');
        code.push_str(&format!("    @LynxProp(name = \"{}\")\n", property.name));
        code.push_str(&format!("    override {} {{\n", setter));
        code.push_str(&format!(
            "        TODO(\"{}.{} is not implemented\")\n",
            name, property.name
        ));
        code.push_str("    }\n");
    }
    code.push_str("}\n");
    let stub_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Stub,
        subject: name.to_string(),
        path: stub_path,
        content: code,
    };

    Ok(vec![contract_file, stub_file])
}
