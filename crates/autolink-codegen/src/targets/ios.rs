//! Objective-C contracts (protocol headers) and stubs (implementation files).

use std::path::PathBuf;

use autolink_spec::loader::DEFAULT_IOS_SOURCE_DIR;
use autolink_spec::{MethodDescriptor, ParamDescriptor, Platform};

use super::{
    simple_class_name, upper_first, BindingKind, ElementContract, FileRole, MethodContract,
    PlannedFile, TargetContext,
};
use crate::type_mapper::{is_objc_value_type, is_unit, map_optional_type, map_return_type, map_type};

const PLATFORM: Platform = Platform::Ios;

fn source_dir(ctx: &TargetContext<'_>) -> PathBuf {
    let dir = ctx
        .manifest
        .platforms
        .ios
        .as_ref()
        .and_then(|i| i.source_dir.as_deref())
        .unwrap_or(DEFAULT_IOS_SOURCE_DIR);
    PathBuf::from(dir)
}

fn param_type(param: &ParamDescriptor) -> String {
    if param.optional {
        map_optional_type(&param.type_text, PLATFORM)
    } else {
        map_type(&param.type_text, PLATFORM)
    }
}

fn return_type(method: &MethodDescriptor) -> String {
    if is_unit(&method.return_type) {
        "void".to_string()
    } else {
        map_return_type(&method.return_type, PLATFORM)
    }
}

/// `- (void)setItem:(NSString *)key value:(nullable NSString *)value`
fn declaration(method: &MethodDescriptor) -> String {
    let mut parts = Vec::with_capacity(method.params.len());
    for (i, param) in method.params.iter().enumerate() {
        let label = if i == 0 { method.name.as_str() } else { param.name.as_str() };
        parts.push(format!("{}:({}){}", label, param_type(param), param.name));
    }
    if parts.is_empty() {
        format!("- ({}){}", return_type(method), method.name)
    } else {
        format!("- ({}){}", return_type(method), parts.join(" "))
    }
}

/// `setItem:value:`
fn selector(method: &MethodDescriptor) -> String {
    let mut selector = method.name.clone();
    for (i, param) in method.params.iter().enumerate() {
        if i > 0 {
            selector.push_str(&param.name);
        }
        selector.push(':');
    }
    selector
}

fn default_return(objc_type: &str) -> Option<&'static str> {
    match objc_type {
        "void" => None,
        "BOOL" => Some("NO"),
        t if is_objc_value_type(t) => Some("0"),
        _ => Some("nil"),
    }
}

pub(super) fn method_files(ctx: &TargetContext<'_>, contract: &MethodContract<'_>) -> Vec<PlannedFile> {
    let name = contract.name();
    let spec = format!("{}Spec", name);
    let class = simple_class_name(contract.class_name);
    let constant = format!("k{}{}Name", name, upper_first(contract.kind.as_str()));
    let methods = &contract.descriptor.methods;

    // Contract
    let mut code = ctx.header();
    code.push_str("#import <Foundation/Foundation.h>\n");
    code.push_str("#import <Lynx/LynxModule.h>\n\n");
    code.push_str("NS_ASSUME_NONNULL_BEGIN\n\n");
    code.push_str(&format!("static NSString *const {} = @\"{}\";\n\n", constant, name));
    let base = match contract.kind {
        BindingKind::Module => "LynxModule",
        BindingKind::Service => "NSObject",
    };
    code.push_str(&format!("@protocol {} <{}>\n\n", spec, base));
    for method in methods {
        code.push_str(&format!("{};\n", declaration(method)));
    }
    if !methods.is_empty() {
        code.push('\n');
    }
    code.push_str("@end\n\n");
    code.push_str(&format!("@interface {} : NSObject <{}>\n@end\n\n", class, spec));
    code.push_str("NS_ASSUME_NONNULL_END\n");
    let contract_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Contract,
        subject: name.to_string(),
        path: source_dir(ctx).join("generated").join(format!("{}.h", spec)),
        content: code,
    };

    // Stub
    let mut code = format!("#import \"generated/{}.h\"\n\n", spec);
    code.push_str(&format!("@implementation {}\n\n", class));
    if contract.kind == BindingKind::Module {
        code.push_str("+ (NSString *)name {\n");
        code.push_str(&format!("  return {};\n", constant));
        code.push_str("}\n\n");
        code.push_str("+ (NSDictionary<NSString *, NSString *> *)methodLookup {\n");
        code.push_str("  return @{\n");
        for method in methods {
            code.push_str(&format!(
                "    @\"{}\" : NSStringFromSelector(@selector({})),\n",
                method.name,
                selector(method)
            ));
        }
        code.push_str("  };\n");
        code.push_str("}\n\n");
    }
    for method in methods {
        code.push_str(&format!("{} {{\n", declaration(method)));
        if let Some(value) = default_return(&return_type(method)) {
            code.push_str(&format!("  return {};\n", value));
        }
        code.push_str("}\n\n");
    }
    code.push_str("@end\n");
    let stub_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Stub,
        subject: name.to_string(),
        path: source_dir(ctx).join(format!("{}.m", class)),
        content: code,
    };

    vec![contract_file, stub_file]
}

pub(super) fn element_files(ctx: &TargetContext<'_>, contract: &ElementContract<'_>) -> Vec<PlannedFile> {
    let name = contract.name();
    let spec = format!("{}Spec", name);
    let class = simple_class_name(contract.class_name);
    let setters: Vec<String> = contract
        .descriptor
        .properties
        .iter()
        .map(|p| {
            let ty = if p.optional {
                map_optional_type(&p.type_text, PLATFORM)
            } else {
                map_type(&p.type_text, PLATFORM)
            };
            format!("- (void)set{}:({})value", upper_first(&p.name), ty)
        })
        .collect();

    // Contract
    let mut code = ctx.header();
    code.push_str("#import <Foundation/Foundation.h>\n");
    code.push_str("#import <Lynx/LynxUI.h>\n\n");
    code.push_str("NS_ASSUME_NONNULL_BEGIN\n\n");
    code.push_str(&format!("static NSString *const k{}ElementName = @\"{}\";\n", name, name));
    code.push_str(&format!(
        "static NSString *const k{}TagName = @\"{}\";\n\n",
        name,
        contract.tag()
    ));
    code.push_str(&format!("@protocol {} <NSObject>\n\n", spec));
    for setter in &setters {
        code.push_str(&format!("{};\n", setter));
    }
    if !setters.is_empty() {
        code.push('\n');
    }
    code.push_str("@end\n\n");
    code.push_str(&format!("@interface {} : LynxUI <{}>\n@end\n\n", class, spec));
    code.push_str("NS_ASSUME_NONNULL_END\n");
    let contract_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Contract,
        subject: name.to_string(),
        path: source_dir(ctx).join("generated").join(format!("{}.h", spec)),
        content: code,
    };

    // Stub
    let mut code = format!("#import \"generated/{}.h\"\n\n", spec);
    code.push_str(&format!("@implementation {}\n\n", class));
    code.push_str("- (UIView *)createView {\n");
    code.push_str("  return [[UIView alloc] init];\n");
    code.push_str("}\n\n");
    for setter in &setters {
        code.push_str(&format!("{} {{\n}}\n\n", setter));
    }
    code.push_str("@end\n");
    let stub_file = PlannedFile {
        platform: PLATFORM,
        role: FileRole::Stub,
        subject: name.to_string(),
        path: source_dir(ctx).join(format!("{}.m", class)),
        content: code,
    };

    vec![contract_file, stub_file]
}
