//! Tree construction from classified items.

use std::collections::HashMap;

use log::info;

use super::{NodeKind, TreeNode};
use crate::classifier::{classify_item, DetectedFile, DetectedType};
use crate::model::{ItemId, UploadedItem};
use crate::parser::{parse_abap_content, ParsedContent};

const ROOT_ID: &str = "root";

/// Item lookup shared by the node builders
struct ItemIndex<'a> {
    by_id: HashMap<&'a ItemId, &'a UploadedItem>,
}

impl<'a> ItemIndex<'a> {
    fn new(items: &'a [UploadedItem]) -> Self {
        Self {
            by_id: items.iter().map(|item| (&item.id, item)).collect(),
        }
    }

    /// Parses the item's content, `None` while the content is not loaded
    fn parse(&self, id: &ItemId) -> Option<ParsedContent> {
        self.by_id
            .get(id)
            .and_then(|item| item.content.as_deref())
            .filter(|content| !content.is_empty())
            .map(parse_abap_content)
    }
}

/// Groups files by key, keeping first-seen order of keys and files
fn group_by_key<'a>(files: &[&'a DetectedFile]) -> Vec<(String, Vec<&'a DetectedFile>)> {
    let mut groups: Vec<(String, Vec<&'a DetectedFile>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for file in files {
        let key = file.group_key_or_base().to_string();
        match positions.get(&key) {
            Some(&idx) => groups[idx].1.push(file),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![file]));
            }
        }
    }
    groups
}

fn all_of<'a>(files: &[&'a DetectedFile], detected: &[DetectedType]) -> Vec<&'a DetectedFile> {
    files
        .iter()
        .copied()
        .filter(|f| detected.contains(&f.detected()))
        .collect()
}

/// Builds the navigator tree for the whole item collection.
///
/// Folders are attached to the root in a fixed order (function groups,
/// programs, classes/interfaces, other) and only when non-empty. Within a
/// folder, objects appear in discovery order.
pub fn build_tree(items: &[UploadedItem], package_name: &str) -> TreeNode {
    let index = ItemIndex::new(items);
    let detected: Vec<DetectedFile> = items.iter().map(classify_item).collect();

    let fg_files: Vec<&DetectedFile> = detected
        .iter()
        .filter(|d| d.detected().is_function_group_part())
        .collect();
    let program_files: Vec<&DetectedFile> = detected
        .iter()
        .filter(|d| d.detected().is_program_part())
        .collect();
    let class_files: Vec<&DetectedFile> = detected
        .iter()
        .filter(|d| d.detected() == DetectedType::Class)
        .collect();
    let interface_files: Vec<&DetectedFile> = detected
        .iter()
        .filter(|d| d.detected() == DetectedType::Interface)
        .collect();
    let uncategorized: Vec<&DetectedFile> = detected
        .iter()
        .filter(|d| {
            let t = d.detected();
            !(t.is_function_group_part() || t.is_program_part() || t.is_class_like())
        })
        .collect();

    let mut children = Vec::new();

    let fg_groups = group_by_key(&fg_files);
    if !fg_groups.is_empty() {
        let groups = fg_groups
            .iter()
            .map(|(name, files)| build_function_group_node(name, files, &index))
            .collect();
        children.push(TreeNode::folder(
            "fg-folder",
            "Function Groups",
            NodeKind::FunctionGroupsFolder,
            groups,
        ));
    }

    let program_groups = group_by_key(&program_files);
    if !program_groups.is_empty() {
        let programs = program_groups
            .iter()
            .map(|(name, files)| match files.as_slice() {
                [single] if single.detected() == DetectedType::Program => {
                    build_simple_program_node(single, &index)
                }
                _ => build_program_node(name, files, &index),
            })
            .collect();
        children.push(TreeNode::folder(
            "prog-folder",
            "Programs / Reports",
            NodeKind::ProgramsFolder,
            programs,
        ));
    }

    if !class_files.is_empty() || !interface_files.is_empty() {
        let classes = class_files
            .iter()
            .map(|d| TreeNode::leaf(format!("class-{}", d.item_id), &d.file_name, NodeKind::Class, &d.item_id))
            .chain(
                interface_files
                    .iter()
                    .map(|d| TreeNode::leaf(format!("if-{}", d.item_id), &d.file_name, NodeKind::Interface, &d.item_id)),
            )
            .collect();
        children.push(TreeNode::folder(
            "class-folder",
            "Classes / Interfaces",
            NodeKind::ClassesFolder,
            classes,
        ));
    }

    if !uncategorized.is_empty() {
        let others = uncategorized
            .iter()
            .map(|d| TreeNode::leaf(format!("uncat-{}", d.item_id), &d.file_name, NodeKind::File, &d.item_id))
            .collect();
        children.push(TreeNode::folder(
            "uncat-folder",
            "Other Objects",
            NodeKind::UncategorizedFolder,
            others,
        ));
    }

    info!(
        "built tree for {} item(s): {} function group(s), {} program(s), {} class/interface file(s), {} other",
        items.len(),
        fg_groups.len(),
        program_groups.len(),
        class_files.len() + interface_files.len(),
        uncategorized.len()
    );

    TreeNode::folder(ROOT_ID, package_name, NodeKind::Package, children)
}

fn build_function_group_node(group: &str, files: &[&DetectedFile], index: &ItemIndex<'_>) -> TreeNode {
    let mut children = Vec::new();

    let registry = [
        (DetectedType::FgMain, "fg-main", NodeKind::FgMainProgram),
        (DetectedType::FgTop, "fg-top", NodeKind::FgTopInclude),
        (DetectedType::FgUxx, "fg-uxx", NodeKind::FgUxxInclude),
        (DetectedType::FgFxx, "fg-fxx", NodeKind::FgFxxInclude),
    ];
    for (detected, tag, kind) in registry {
        children.extend(all_of(files, &[detected]).into_iter().map(|file| {
            TreeNode::leaf(format!("{}-{}", tag, file.item_id), &file.file_name, kind, &file.item_id)
        }));
    }

    let func_includes = all_of(files, &[DetectedType::FgFuncInclude]);
    if !func_includes.is_empty() {
        let mut modules = Vec::new();
        for file in func_includes {
            let functions = index.parse(&file.item_id).map(|p| p.functions).unwrap_or_default();
            if functions.is_empty() {
                modules.push(TreeNode::leaf(
                    format!("fg-fm-{}", file.item_id),
                    &file.file_name,
                    NodeKind::FunctionModuleInclude,
                    &file.item_id,
                ));
            } else {
                modules.extend(functions.into_iter().enumerate().map(|(idx, function)| {
                    TreeNode::leaf(
                        format!("fg-fm-{}-fn-{}", file.item_id, idx),
                        function.name,
                        NodeKind::FunctionModuleInclude,
                        &file.item_id,
                    )
                }));
            }
        }
        children.push(TreeNode::folder(
            format!("fg-fmods-{}", group),
            "Function Modules",
            NodeKind::FgFunctionModulesFolder,
            modules,
        ));
    }

    let form_includes = all_of(files, &[DetectedType::FgFormInclude]);
    if !form_includes.is_empty() {
        let includes = form_includes
            .into_iter()
            .map(|file| {
                let mut parsed_items = Vec::new();
                if let Some(parsed) = index.parse(&file.item_id) {
                    parsed_items.extend(parsed.forms.iter().enumerate().map(|(idx, form)| {
                        TreeNode::leaf(
                            format!("fg-fi-{}-form-{}", file.item_id, idx),
                            format!("FORM {}", form.name),
                            NodeKind::FormInclude,
                            &file.item_id,
                        )
                    }));
                    parsed_items.extend(parsed.modules.iter().enumerate().map(|(idx, module)| {
                        TreeNode::leaf(
                            format!("fg-fi-{}-mod-{}", file.item_id, idx),
                            format!("MODULE {} {}", module.name, module.direction),
                            NodeKind::FormInclude,
                            &file.item_id,
                        )
                    }));
                }
                TreeNode::item(
                    format!("fg-fi-{}", file.item_id),
                    &file.file_name,
                    NodeKind::FormInclude,
                    &file.item_id,
                    parsed_items,
                )
            })
            .collect();
        children.push(TreeNode::folder(
            format!("fg-incs-{}", group),
            "Includes",
            NodeKind::FgIncludesFolder,
            includes,
        ));
    }

    TreeNode::folder(format!("fg-{}", group), group, NodeKind::FunctionGroup, children)
}

/// Parsed FORM and MODULE names of one file as leaf nodes
fn parsed_sub_items(prefix: &str, item_id: &ItemId, parsed: &ParsedContent, forms: bool, modules: bool) -> Vec<TreeNode> {
    let mut nodes = Vec::new();
    if forms {
        nodes.extend(parsed.forms.iter().enumerate().map(|(idx, form)| {
            TreeNode::leaf(
                format!("{}-{}-form-{}", prefix, item_id, idx),
                format!("FORM {}", form.name),
                NodeKind::Include,
                item_id,
            )
        }));
    }
    if modules {
        nodes.extend(parsed.modules.iter().enumerate().map(|(idx, module)| {
            TreeNode::leaf(
                format!("{}-{}-mod-{}", prefix, item_id, idx),
                format!("MODULE {} {}", module.name, module.direction),
                NodeKind::ScreenInclude,
                item_id,
            )
        }));
    }
    nodes
}

fn build_simple_program_node(file: &DetectedFile, index: &ItemIndex<'_>) -> TreeNode {
    let parsed = index.parse(&file.item_id);
    let children = parsed
        .as_ref()
        .map(|p| parsed_sub_items("prog", &file.item_id, p, true, true))
        .unwrap_or_default();
    let label = parsed
        .and_then(|p| p.report_name)
        .unwrap_or_else(|| file.file_name.clone());

    TreeNode::item(
        format!("prog-{}", file.item_id),
        label,
        NodeKind::Program,
        &file.item_id,
        children,
    )
}

/// Program group: every main program, then TOP, PBO, PAI and other includes,
/// each slot in discovery order
fn build_program_node(program: &str, files: &[&DetectedFile], index: &ItemIndex<'_>) -> TreeNode {
    let mut children = Vec::new();

    for main in all_of(files, &[DetectedType::Program]) {
        children.push(TreeNode::leaf(
            format!("prog-main-{}", main.item_id),
            &main.file_name,
            NodeKind::Program,
            &main.item_id,
        ));
    }

    for top in all_of(files, &[DetectedType::ProgramTop]) {
        children.push(TreeNode::leaf(
            format!("prog-top-{}", top.item_id),
            &top.file_name,
            NodeKind::TopInclude,
            &top.item_id,
        ));
    }

    let screen_includes = [
        (DetectedType::ProgramPbo, "prog-pbo", NodeKind::PboInclude),
        (DetectedType::ProgramPai, "prog-pai", NodeKind::PaiInclude),
    ];
    for (detected, prefix, kind) in screen_includes {
        for file in all_of(files, &[detected]) {
            let modules = index
                .parse(&file.item_id)
                .map(|p| parsed_sub_items(prefix, &file.item_id, &p, false, true))
                .unwrap_or_default();
            children.push(TreeNode::item(
                format!("{}-{}", prefix, file.item_id),
                &file.file_name,
                kind,
                &file.item_id,
                modules,
            ));
        }
    }

    for file in all_of(files, &[DetectedType::ProgramFormInclude, DetectedType::ProgramInclude]) {
        let forms = index
            .parse(&file.item_id)
            .map(|p| parsed_sub_items("prog-inc", &file.item_id, &p, true, false))
            .unwrap_or_default();
        children.push(TreeNode::item(
            format!("prog-inc-{}", file.item_id),
            &file.file_name,
            NodeKind::Include,
            &file.item_id,
            forms,
        ));
    }

    TreeNode::folder(format!("progrp-{}", program), program, NodeKind::Program, children)
}
