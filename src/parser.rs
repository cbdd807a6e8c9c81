//! Line-oriented scanner for ABAP source text.
//!
//! Extracts the declared constructs the tree builder and the classification
//! refiner care about: report/class/interface names, FUNCTION, FORM and
//! MODULE bodies with their line ranges, INCLUDE references and TABLES
//! declarations.
//!
//! FUNCTION, FORM and MODULE are tracked by three independent state machines.
//! ABAP forbids nesting these blocks, so each machine only ever holds one open
//! block; a block closes only on its own terminator line.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref REPORT_RE: Regex = Regex::new(r"(?i)^\s*(?:REPORT|PROGRAM)\s+(\S+?)[\s.]").unwrap();
    static ref CLASS_RE: Regex =
        Regex::new(r"(?i)^\s*CLASS\s+(\S+)\s+(?:DEFINITION|IMPLEMENTATION)").unwrap();
    static ref INTERFACE_RE: Regex = Regex::new(r"(?i)^\s*INTERFACE\s+(\S+)").unwrap();
    static ref FUNCTION_RE: Regex = Regex::new(r"(?i)^\s*FUNCTION\s+(\S+?)[\s.]").unwrap();
    static ref ENDFUNCTION_RE: Regex = Regex::new(r"(?i)^\s*ENDFUNCTION\s*\.").unwrap();
    static ref FORM_RE: Regex = Regex::new(r"(?i)^\s*FORM\s+(\S+)").unwrap();
    static ref ENDFORM_RE: Regex = Regex::new(r"(?i)^\s*ENDFORM\s*\.").unwrap();
    static ref MODULE_RE: Regex = Regex::new(r"(?i)^\s*MODULE\s+(\S+)\s+(INPUT|OUTPUT)").unwrap();
    static ref ENDMODULE_RE: Regex = Regex::new(r"(?i)^\s*ENDMODULE\s*\.").unwrap();
    static ref INCLUDE_RE: Regex = Regex::new(r"(?i)^\s*INCLUDE\s+(\S+?)[\s.]").unwrap();
    static ref TABLES_RE: Regex = Regex::new(r"(?i)^\s*TABLES\s*:\s*(.+)").unwrap();
}

/// A FUNCTION or FORM body, lines are 1-indexed and inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedBlock {
    /// Declared name
    pub name: String,
    /// Line of the opening keyword
    pub start_line: usize,
    /// Line of the terminator keyword
    pub end_line: usize,
}

/// Screen-flow phase a MODULE is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModuleDirection {
    /// Process-after-input
    Input,
    /// Process-before-output
    Output,
}

impl ModuleDirection {
    fn from_keyword(keyword: &str) -> Self {
        if keyword.eq_ignore_ascii_case("INPUT") {
            ModuleDirection::Input
        } else {
            ModuleDirection::Output
        }
    }

    /// Keyword as written in source
    pub fn keyword(self) -> &'static str {
        match self {
            ModuleDirection::Input => "INPUT",
            ModuleDirection::Output => "OUTPUT",
        }
    }
}

impl fmt::Display for ModuleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A MODULE ... INPUT/OUTPUT body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedModule {
    /// Declared name
    pub name: String,
    /// Screen phase
    pub direction: ModuleDirection,
    /// Line of the opening keyword
    pub start_line: usize,
    /// Line of ENDMODULE
    pub end_line: usize,
}

/// Everything the scanner found in one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContent {
    /// Name from the last REPORT/PROGRAM statement
    pub report_name: Option<String>,
    /// Name from the last CLASS ... DEFINITION/IMPLEMENTATION statement
    pub class_name: Option<String>,
    /// Name from the last INTERFACE statement
    pub interface_name: Option<String>,
    /// Closed FUNCTION bodies in source order
    pub functions: Vec<ParsedBlock>,
    /// Closed FORM bodies in source order
    pub forms: Vec<ParsedBlock>,
    /// Closed MODULE bodies in source order
    pub modules: Vec<ParsedModule>,
    /// INCLUDE references
    pub includes: Vec<String>,
    /// Names declared with `TABLES:`
    pub tables: Vec<String>,
}

/// Open/closed tracker for one block kind
#[derive(Debug)]
enum BlockState<T> {
    Closed,
    Open { header: T, start_line: usize },
}

impl<T> BlockState<T> {
    fn open(&mut self, header: T, start_line: usize) {
        *self = BlockState::Open { header, start_line };
    }

    /// Closes the block if one is open, returning its header and start line
    fn close(&mut self) -> Option<(T, usize)> {
        match std::mem::replace(self, BlockState::Closed) {
            BlockState::Open { header, start_line } => Some((header, start_line)),
            BlockState::Closed => None,
        }
    }
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('*') || trimmed.starts_with('"')
}

fn strip_terminal_period(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Scans ABAP source text in a single forward pass
pub fn parse_abap_content(content: &str) -> ParsedContent {
    let mut result = ParsedContent::default();

    let mut function: BlockState<String> = BlockState::Closed;
    let mut form: BlockState<String> = BlockState::Closed;
    let mut module: BlockState<(String, ModuleDirection)> = BlockState::Closed;

    for (idx, raw_line) in content.split('\n').enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        let comment = is_comment(line);

        if let Some(caps) = REPORT_RE.captures(line) {
            result.report_name = Some(caps[1].to_string());
        }

        if let Some(caps) = CLASS_RE.captures(line) {
            result.class_name = Some(caps[1].to_string());
        }

        if let Some(caps) = INTERFACE_RE.captures(line) {
            result.interface_name = Some(strip_terminal_period(&caps[1]).to_string());
        }

        if !comment {
            if let Some(caps) = FUNCTION_RE.captures(line) {
                function.open(caps[1].to_string(), line_no);
            }
        }
        if ENDFUNCTION_RE.is_match(line) {
            if let Some((name, start_line)) = function.close() {
                result.functions.push(ParsedBlock { name, start_line, end_line: line_no });
            }
        }

        if !comment {
            if let Some(caps) = FORM_RE.captures(line) {
                form.open(strip_terminal_period(&caps[1]).to_string(), line_no);
            }
        }
        if ENDFORM_RE.is_match(line) {
            if let Some((name, start_line)) = form.close() {
                result.forms.push(ParsedBlock { name, start_line, end_line: line_no });
            }
        }

        if !comment {
            if let Some(caps) = MODULE_RE.captures(line) {
                let direction = ModuleDirection::from_keyword(&caps[2]);
                module.open((strip_terminal_period(&caps[1]).to_string(), direction), line_no);
            }
        }
        if ENDMODULE_RE.is_match(line) {
            if let Some(((name, direction), start_line)) = module.close() {
                result.modules.push(ParsedModule {
                    name,
                    direction,
                    start_line,
                    end_line: line_no,
                });
            }
        }

        if !comment {
            if let Some(caps) = INCLUDE_RE.captures(line) {
                result.includes.push(caps[1].to_string());
            }
        }

        if let Some(caps) = TABLES_RE.captures(line) {
            let list = strip_terminal_period(caps[1].trim_end());
            result.tables.extend(
                list.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from),
            );
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REPORT: &str = "\
*&---------------------------------------------------------------------*
*& Report Z_SALES_ORDER_REPORT
*&---------------------------------------------------------------------*
REPORT z_sales_order_report.

TABLES: vbak, vbap, kna1.
INCLUDE z_sales_top.

START-OF-SELECTION.
  PERFORM get_sales_data.

FORM get_sales_data.
  SELECT * FROM vbak INTO TABLE gt_sales.
ENDFORM.

FORM display_report USING iv_title.
  WRITE iv_title.
ENDFORM.
";

    #[test]
    fn test_report_with_forms_tables_and_includes() {
        let parsed = parse_abap_content(REPORT);

        assert_eq!(parsed.report_name.as_deref(), Some("z_sales_order_report"));
        assert_eq!(parsed.tables, vec!["vbak", "vbap", "kna1"]);
        assert_eq!(parsed.includes, vec!["z_sales_top"]);
        assert_eq!(
            parsed.forms,
            vec![
                ParsedBlock { name: "get_sales_data".into(), start_line: 12, end_line: 14 },
                ParsedBlock { name: "display_report".into(), start_line: 16, end_line: 18 },
            ]
        );
        assert!(parsed.functions.is_empty());
    }

    #[test]
    fn test_function_bodies_and_function_pool() {
        let source = "FUNCTION-POOL zgrp.\nFUNCTION z_get.\n  \" body\nENDFUNCTION.\nfunction z_set .\nendfunction.\n";
        let parsed = parse_abap_content(source);

        let names: Vec<_> = parsed.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["z_get", "z_set"]);
        assert_eq!(parsed.functions[0].start_line, 2);
        assert_eq!(parsed.functions[0].end_line, 4);
        assert_eq!(parsed.functions[1].start_line, 5);
    }

    #[test]
    fn test_modules_keep_direction() {
        let source = "MODULE status_0100 OUTPUT.\n  SET PF-STATUS 'MAIN'.\nENDMODULE.\nMODULE user_command_0100 INPUT.\nENDMODULE.";
        let parsed = parse_abap_content(source);

        assert_eq!(parsed.modules.len(), 2);
        assert_eq!(parsed.modules[0].name, "status_0100");
        assert_eq!(parsed.modules[0].direction, ModuleDirection::Output);
        assert_eq!(parsed.modules[1].direction, ModuleDirection::Input);
        assert_eq!(parsed.modules[1].end_line, 5);
    }

    #[test]
    fn test_unterminated_block_is_dropped() {
        let parsed = parse_abap_content("FORM never_closed.\n  WRITE 'x'.\n");
        assert!(parsed.forms.is_empty());
    }

    #[test]
    fn test_commented_keywords_are_ignored() {
        let source = "* FORM commented.\n\" FUNCTION z_commented.\nENDFORM.\nENDFUNCTION.";
        let parsed = parse_abap_content(source);
        assert!(parsed.forms.is_empty());
        assert!(parsed.functions.is_empty());
    }

    #[test]
    fn test_class_and_interface_names() {
        let parsed = parse_abap_content(
            "INTERFACE zif_reader.\nENDINTERFACE.\nCLASS zcl_reader DEFINITION PUBLIC.\n  PUBLIC SECTION.\n    INTERFACES zif_reader.\nENDCLASS.",
        );
        assert_eq!(parsed.class_name.as_deref(), Some("zcl_reader"));
        assert_eq!(parsed.interface_name.as_deref(), Some("zif_reader"));
    }

    #[test]
    fn test_report_requires_terminator_after_name() {
        assert_eq!(parse_abap_content("REPORT zfoo").report_name, None);
        assert_eq!(
            parse_abap_content("  program zbar message-id zz.").report_name.as_deref(),
            Some("zbar")
        );
    }

    #[test]
    fn test_reopened_form_replaces_previous_open_form() {
        let parsed = parse_abap_content("FORM a.\nFORM b.\nENDFORM.");
        assert_eq!(
            parsed.forms,
            vec![ParsedBlock { name: "b".into(), start_line: 2, end_line: 3 }]
        );
    }
}
