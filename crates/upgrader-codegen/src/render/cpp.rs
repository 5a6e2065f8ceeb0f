//! C++ source for the mobile runtime's upgrader registry

use std::fmt::Write;

use upgrader_bytecode::{BytecodeDescription, Constant, OperatorString};

use crate::error::CodegenResult;
use crate::registry::UpgraderRegistry;
use crate::render::Render;
use crate::version_map::VersionedUpgrader;

/// Conventional output file name
pub const UPGRADER_MOBILE_FILE_NAME: &str = "upgrader_mobile.cpp";

const DEFAULT_REGENERATE_COMMAND: &str = "gen-mobile-upgraders generate";

/// Emits `upgrader_mobile.cpp`.
///
/// Both accessors build their container once in a function-local static and
/// hand out a reference to it.
#[derive(Debug, Clone)]
pub struct CppRenderer {
    regenerate_command: String,
}

impl Default for CppRenderer {
    fn default() -> Self {
        Self {
            regenerate_command: DEFAULT_REGENERATE_COMMAND.to_string(),
        }
    }
}

impl CppRenderer {
    /// Renderer whose banner tells readers how to regenerate the file
    pub fn with_regenerate_command(command: impl Into<String>) -> Self {
        Self {
            regenerate_command: command.into(),
        }
    }

    fn write_version_map(&self, registry: &UpgraderRegistry, out: &mut String) -> std::fmt::Result {
        out.push_str(
            "const std::unordered_map<std::string, std::vector<Upgrader>>&\n\
             getOperatorVersionMapForMobile() {\n  \
             static std::unordered_map<std::string, std::vector<Upgrader>>\n        \
             operatorVersionMapForMobile({\n",
        );
        for (operator, upgraders) in registry.version_map().iter() {
            writeln!(out, "            {{std::string({}),", string_literal(operator))?;
            out.push_str("                std::vector<Upgrader>({\n");
            let entries: Vec<String> = upgraders.iter().map(upgrader_entry).collect();
            if !entries.is_empty() {
                writeln!(out, "                    {}", entries.join(",\n                    "))?;
            }
            out.push_str("                })},\n");
        }
        out.push_str("      });\n  return operatorVersionMapForMobile;\n}\n");
        Ok(())
    }

    fn write_bytecode_list(&self, registry: &UpgraderRegistry, out: &mut String) -> std::fmt::Result {
        out.push_str(
            "const std::vector<ByteCodeFunctionWithOperator>& getUpgraderBytecodeList() {\n  \
             static std::vector<ByteCodeFunctionWithOperator> upgraderBytecodeList({\n",
        );
        for (_, function) in registry.table().iter() {
            write_function(function, out)?;
        }
        out.push_str("  });\n  return upgraderBytecodeList;\n}\n");
        Ok(())
    }
}

impl Render for CppRenderer {
    fn file_name(&self) -> &str {
        UPGRADER_MOBILE_FILE_NAME
    }

    fn render_into(&self, registry: &UpgraderRegistry, out: &mut String) -> CodegenResult<()> {
        write!(
            out,
            "/**\n \
             * @generated\n \
             * This is an auto-generated file. Please do not modify it by hand.\n \
             * To re-generate, please run:\n \
             * {}\n \
             */\n\n",
            self.regenerate_command
        )?;
        out.push_str(
            "#include <torch/csrc/jit/mobile/upgrader_mobile.h>\n\
             #include <ATen/core/ivalue.h>\n\n\
             namespace c10 {\n\
             TypePtr parseType(const std::string& pythonStr);\n\
             } // namespace c10\n\n\
             namespace torch {\n\
             namespace jit {\n\n\
             // clang-format off\n\n\
             // From operator_versions_map\n\n",
        );
        self.write_version_map(registry, out)?;
        out.push('\n');
        self.write_bytecode_list(registry, out)?;
        out.push_str("\n// clang-format on\n\n} // namespace jit\n} // namespace torch\n");
        Ok(())
    }
}

fn upgrader_entry(upgrader: &VersionedUpgrader) -> String {
    format!(
        "Upgrader({{{}, {}, {}, {}}})",
        upgrader.min_version,
        upgrader.max_version,
        string_literal(&upgrader.upgrader_name),
        upgrader.bytecode_index
    )
}

fn write_function(function: &BytecodeDescription, out: &mut String) -> std::fmt::Result {
    const ITEM: &str = "                           ";

    out.push_str("           ByteCodeFunctionWithOperator({\n");
    out.push_str("               mobile::Function::registerFunc(\n");
    writeln!(out, "                   {},", string_literal(&function.name))?;

    out.push_str("                   std::vector<Instruction>({\n");
    for inst in &function.instructions {
        writeln!(out, "{ITEM}Instruction{{OpCode::{}, {}, {}}},", inst.op, inst.x, inst.n)?;
    }
    out.push_str("                   }), // instructions list\n");

    out.push_str("                   std::vector<c10::IValue>({\n");
    for constant in &function.constants {
        writeln!(out, "{ITEM}{},", constant_value(constant))?;
    }
    out.push_str("                   }), // constants list\n");

    out.push_str("                   std::vector<c10::TypePtr>({\n");
    for ty in &function.types {
        writeln!(out, "{ITEM}c10::parseType({}),", string_literal(ty))?;
    }
    out.push_str("                   }), // types list\n");

    writeln!(out, "                   {}", function.register_size)?;
    out.push_str("               ),\n");

    out.push_str("               std::vector<OperatorString>({\n");
    for operator in &function.operators {
        writeln!(out, "{ITEM}{},", operator_string(operator))?;
    }
    out.push_str("               }), // operators list\n");
    out.push_str("           }),\n");
    Ok(())
}

fn constant_value(constant: &Constant) -> String {
    match constant {
        Constant::Str(s) => format!("c10::IValue({})", string_literal(s)),
        Constant::Bool(b) => format!("c10::IValue({})", b),
        Constant::None => "c10::IValue()".to_string(),
    }
}

fn operator_string(operator: &OperatorString) -> String {
    let num_args = match operator.num_args {
        Some(n) => n.to_string(),
        None => "c10::nullopt".to_string(),
    };
    format!(
        "OperatorString({{{}, {}, {}}})",
        string_literal(&operator.name),
        string_literal(&operator.overload_name),
        num_args
    )
}

/// Quote and escape a string as a C++ literal
fn string_literal(s: &str) -> String {
    let mut lit = String::with_capacity(s.len() + 2);
    lit.push('"');
    for c in s.chars() {
        match c {
            '"' => lit.push_str("\\\""),
            '\\' => lit.push_str("\\\\"),
            '\n' => lit.push_str("\\n"),
            '\r' => lit.push_str("\\r"),
            '\t' => lit.push_str("\\t"),
            c if c.is_control() => {
                // Fixed-width octal so a following digit is not absorbed
                let mut buf = [0; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    let _ = write!(lit, "\\{:03o}", byte);
                }
            }
            c => lit.push(c),
        }
    }
    lit.push('"');
    lit
}
