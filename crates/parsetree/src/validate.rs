//! Well-formedness checks on finished trees.
//!
//! The construction helpers already refuse most malformed nodes. What
//! they cannot see is relational: a child's span against its parent's, a
//! directive reaching a batch compiler, or a tree built field by field or
//! read back from JSON. [`Validator`] walks a tree and collects every such
//! [`Violation`] instead of stopping at the first.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::asttypes::ArgLabel;
use crate::attributes::Attribute;
use crate::class::{
    ClassDeclaration, ClassDescription, ClassExpr, ClassExprDesc, ClassField, ClassType,
    ClassTypeField,
};
use crate::config::{PhraseMode, ValidateConfig};
use crate::core_type::CoreType;
use crate::declarations::{
    ConstructorDeclaration, LabelDeclaration, TypeDeclaration, ValueDescription,
};
use crate::error::{Error, Result};
use crate::expression::{Expression, ExpressionDesc, ValueBinding};
use crate::location::Location;
use crate::module::{
    ModuleBinding, ModuleDeclaration, ModuleExpr, ModuleType, ModuleTypeDeclaration,
    SignatureItem, StructureItem,
};
use crate::pattern::Pattern;
use crate::toplevel::ToplevelPhrase;
use crate::traversal::{Cursor, Visitor, walker};
use crate::variants::VariantSet;

/// One problem found in a tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Cursor path of the offending node, ending in its kind.
    pub path: String,
    pub loc: Location,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind")]
pub enum ViolationKind {
    #[error("span ends before it starts")]
    InvertedSpan,

    #[error("span lies in a different file from its enclosing node")]
    ForeignFile,

    #[error("span is not contained in the enclosing span {parent}")]
    SpanOutsideParent { parent: Location },

    #[error("directive #{name} outside an interactive session")]
    DirectiveInBatch { name: String },

    #[error("`assert false` encoded as an assertion of the literal `false`")]
    NonCanonicalAssertFalse,

    #[error("default argument on parameter `{label}` which is not optional")]
    DefaultWithoutOptionalLabel { label: String },
}

/// Collects [`Violation`]s while visiting a tree.
///
/// One validator can visit several trees; violations accumulate.
#[derive(Debug)]
pub struct Validator<'c> {
    config: &'c ValidateConfig,
    /// Spans of the nodes currently being visited, outermost first.
    parents: Vec<Location>,
    violations: Vec<Violation>,
}

impl<'c> Validator<'c> {
    pub fn new(config: &'c ValidateConfig) -> Self {
        Validator {
            config,
            parents: Vec::new(),
            violations: Vec::new(),
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// `Ok(())` when nothing was reported, otherwise every violation.
    pub fn finish(self) -> Result<()> {
        debug!(violations = self.violations.len(), "validation finished");
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.violations))
        }
    }

    fn report(&mut self, cursor: &Cursor, node: &str, loc: Location, kind: ViolationKind) {
        let path = node_path(cursor, node);
        trace!(%path, %loc, %kind, "violation");
        self.violations.push(Violation { path, loc, kind });
    }

    /// Nearest enclosing span that a non-ghost child must lie inside.
    fn enclosing(&self) -> Option<Location> {
        self.parents
            .iter()
            .rev()
            .find(|loc| !loc.ghost && !loc.is_none())
            .copied()
    }

    fn check_span(&mut self, cursor: &Cursor, node: &str, loc: Location) {
        if loc.is_none() {
            return;
        }
        if self.config.check_spans && loc.start.offset > loc.end.offset {
            self.report(cursor, node, loc, ViolationKind::InvertedSpan);
        }
        if !self.config.check_nesting || loc.ghost {
            return;
        }
        if let Some(parent) = self.enclosing() {
            if parent.file != loc.file {
                self.report(cursor, node, loc, ViolationKind::ForeignFile);
            } else if !parent.contains(&loc) {
                self.report(cursor, node, loc, ViolationKind::SpanOutsideParent { parent });
            }
        }
    }

    fn check_default(
        &mut self,
        cursor: &Cursor,
        node: &str,
        loc: Location,
        label: &ArgLabel,
        has_default: bool,
    ) {
        if has_default && !label.is_optional() {
            self.report(
                cursor,
                node,
                loc,
                ViolationKind::DefaultWithoutOptionalLabel {
                    label: label.to_string(),
                },
            );
        }
    }

    /// Check `loc`, then run `walk` with `loc` as the enclosing span.
    fn scoped(
        &mut self,
        cursor: &mut Cursor,
        node: &str,
        loc: Location,
        walk: impl FnOnce(&mut Self, &mut Cursor),
    ) {
        self.check_span(cursor, node, loc);
        self.parents.push(loc);
        walk(self, cursor);
        self.parents.pop();
    }
}

fn node_path(cursor: &Cursor, node: &str) -> String {
    if cursor.depth() == 0 {
        node.to_string()
    } else {
        format!("{}/{}", cursor.path(), node)
    }
}

impl Visitor for Validator<'_> {
    fn visit_toplevel_phrase(&mut self, cursor: &mut Cursor, phrase: &ToplevelPhrase) {
        if let ToplevelPhrase::Directive { name, loc, .. } = phrase {
            self.check_span(cursor, "Directive", *loc);
            if self.config.mode == PhraseMode::Batch {
                self.report(
                    cursor,
                    "Directive",
                    *loc,
                    ViolationKind::DirectiveInBatch { name: name.clone() },
                );
            }
        }
        walker::walk_toplevel_phrase(self, cursor, phrase);
    }

    fn visit_structure_item(&mut self, cursor: &mut Cursor, item: &StructureItem) {
        self.scoped(cursor, item.desc.variant_name(), item.loc, |v, c| {
            walker::walk_structure_item(v, c, item)
        });
    }

    fn visit_signature_item(&mut self, cursor: &mut Cursor, item: &SignatureItem) {
        self.scoped(cursor, item.desc.variant_name(), item.loc, |v, c| {
            walker::walk_signature_item(v, c, item)
        });
    }

    fn visit_module_expr(&mut self, cursor: &mut Cursor, module: &ModuleExpr) {
        self.scoped(cursor, module.desc.variant_name(), module.loc, |v, c| {
            walker::walk_module_expr(v, c, module)
        });
    }

    fn visit_module_type(&mut self, cursor: &mut Cursor, module_type: &ModuleType) {
        self.scoped(cursor, module_type.desc.variant_name(), module_type.loc, |v, c| {
            walker::walk_module_type(v, c, module_type)
        });
    }

    fn visit_module_binding(&mut self, cursor: &mut Cursor, binding: &ModuleBinding) {
        self.scoped(cursor, "ModuleBinding", binding.loc, |v, c| {
            walker::walk_module_binding(v, c, binding)
        });
    }

    fn visit_module_declaration(&mut self, cursor: &mut Cursor, decl: &ModuleDeclaration) {
        self.scoped(cursor, "ModuleDeclaration", decl.loc, |v, c| {
            walker::walk_module_declaration(v, c, decl)
        });
    }

    fn visit_module_type_declaration(
        &mut self,
        cursor: &mut Cursor,
        decl: &ModuleTypeDeclaration,
    ) {
        self.scoped(cursor, "ModuleTypeDeclaration", decl.loc, |v, c| {
            walker::walk_module_type_declaration(v, c, decl)
        });
    }

    fn visit_value_description(&mut self, cursor: &mut Cursor, desc: &ValueDescription) {
        self.scoped(cursor, "ValueDescription", desc.loc, |v, c| {
            walker::walk_value_description(v, c, desc)
        });
    }

    fn visit_type_declaration(&mut self, cursor: &mut Cursor, decl: &TypeDeclaration) {
        self.scoped(cursor, "TypeDeclaration", decl.loc, |v, c| {
            walker::walk_type_declaration(v, c, decl)
        });
    }

    fn visit_constructor_declaration(
        &mut self,
        cursor: &mut Cursor,
        decl: &ConstructorDeclaration,
    ) {
        self.scoped(cursor, "ConstructorDeclaration", decl.loc, |v, c| {
            walker::walk_constructor_declaration(v, c, decl)
        });
    }

    fn visit_label_declaration(&mut self, cursor: &mut Cursor, decl: &LabelDeclaration) {
        self.scoped(cursor, "LabelDeclaration", decl.loc, |v, c| {
            walker::walk_label_declaration(v, c, decl)
        });
    }

    fn visit_class_declaration(&mut self, cursor: &mut Cursor, decl: &ClassDeclaration) {
        self.scoped(cursor, "ClassDeclaration", decl.loc, |v, c| {
            walker::walk_class_declaration(v, c, decl)
        });
    }

    fn visit_class_description(&mut self, cursor: &mut Cursor, desc: &ClassDescription) {
        self.scoped(cursor, "ClassDescription", desc.loc, |v, c| {
            walker::walk_class_description(v, c, desc)
        });
    }

    fn visit_class_expr(&mut self, cursor: &mut Cursor, class_expr: &ClassExpr) {
        let node = class_expr.desc.variant_name();
        if let ClassExprDesc::Fun { label, default, .. } = &class_expr.desc {
            self.check_default(cursor, node, class_expr.loc, label, default.is_some());
        }
        self.scoped(cursor, node, class_expr.loc, |v, c| {
            walker::walk_class_expr(v, c, class_expr)
        });
    }

    fn visit_class_field(&mut self, cursor: &mut Cursor, field: &ClassField) {
        self.scoped(cursor, field.desc.variant_name(), field.loc, |v, c| {
            walker::walk_class_field(v, c, field)
        });
    }

    fn visit_class_type(&mut self, cursor: &mut Cursor, class_type: &ClassType) {
        self.scoped(cursor, class_type.desc.variant_name(), class_type.loc, |v, c| {
            walker::walk_class_type(v, c, class_type)
        });
    }

    fn visit_class_type_field(&mut self, cursor: &mut Cursor, field: &ClassTypeField) {
        self.scoped(cursor, field.desc.variant_name(), field.loc, |v, c| {
            walker::walk_class_type_field(v, c, field)
        });
    }

    fn visit_value_binding(&mut self, cursor: &mut Cursor, binding: &ValueBinding) {
        self.scoped(cursor, "ValueBinding", binding.loc, |v, c| {
            walker::walk_value_binding(v, c, binding)
        });
    }

    fn visit_expression(&mut self, cursor: &mut Cursor, expr: &Expression) {
        let node = expr.desc.variant_name();
        match &expr.desc {
            ExpressionDesc::Assert { cond }
                if self.config.require_canonical_assert_false && cond.is_false_literal() =>
            {
                self.report(cursor, node, expr.loc, ViolationKind::NonCanonicalAssertFalse);
            }
            ExpressionDesc::Function { label, default, .. } => {
                self.check_default(cursor, node, expr.loc, label, default.is_some());
            }
            _ => {}
        }
        self.scoped(cursor, node, expr.loc, |v, c| {
            walker::walk_expression(v, c, expr)
        });
    }

    fn visit_pattern(&mut self, cursor: &mut Cursor, pattern: &Pattern) {
        self.scoped(cursor, pattern.desc.variant_name(), pattern.loc, |v, c| {
            walker::walk_pattern(v, c, pattern)
        });
    }

    fn visit_core_type(&mut self, cursor: &mut Cursor, ty: &CoreType) {
        self.scoped(cursor, ty.desc.variant_name(), ty.loc, |v, c| {
            walker::walk_core_type(v, c, ty)
        });
    }

    fn visit_attribute(&mut self, cursor: &mut Cursor, attribute: &Attribute) {
        let node = format!("@{}", attribute.name.txt);
        self.check_span(cursor, &node, attribute.name.loc);
        walker::walk_attribute(self, cursor, attribute);
    }
}

/// Validate a compilation unit.
pub fn validate_structure(structure: &[StructureItem], config: &ValidateConfig) -> Result<()> {
    let mut validator = Validator::new(config);
    validator.traverse_structure(structure);
    validator.finish()
}

/// Validate an interface.
pub fn validate_signature(signature: &[SignatureItem], config: &ValidateConfig) -> Result<()> {
    let mut validator = Validator::new(config);
    validator.traverse_signature(signature);
    validator.finish()
}

/// Validate a toplevel phrase; directives are accepted only in
/// [`PhraseMode::Interactive`].
pub fn validate_phrase(phrase: &ToplevelPhrase, config: &ValidateConfig) -> Result<()> {
    let mut validator = Validator::new(config);
    validator.traverse_phrase(phrase);
    validator.finish()
}

/// Validate a single expression tree.
pub fn validate_expression(expr: &Expression, config: &ValidateConfig) -> Result<()> {
    let mut validator = Validator::new(config);
    validator.visit_expression(&mut Cursor::new(), expr);
    validator.finish()
}
