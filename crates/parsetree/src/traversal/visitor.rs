use super::cursor::Cursor;
use super::walker;
use crate::attributes::{Attribute, Extension};
use crate::class::{
    ClassDeclaration, ClassDescription, ClassExpr, ClassField, ClassSignature, ClassStructure,
    ClassType, ClassTypeField,
};
use crate::core_type::CoreType;
use crate::declarations::{
    ConstructorDeclaration, LabelDeclaration, TypeDeclaration, ValueDescription,
};
use crate::expression::{Case, Expression, ValueBinding};
use crate::module::{
    ModuleBinding, ModuleDeclaration, ModuleExpr, ModuleType, ModuleTypeDeclaration,
    OpenDescription, SignatureItem, StructureItem, WithConstraint,
};
use crate::pattern::Pattern;
use crate::toplevel::ToplevelPhrase;

/// Read-only traversal over every node kind of the tree.
///
/// Each method defaults to the matching `walk_*` function, which visits
/// the node's attributes and children in source order. Override a method
/// to observe a node kind; call the walker from the override to keep
/// descending.
pub trait Visitor: Sized {
    /// Entry point for a compilation unit.
    fn traverse_structure(&mut self, structure: &[StructureItem]) {
        let mut cursor = Cursor::new();
        self.visit_structure(&mut cursor, structure);
    }

    /// Entry point for an interface.
    fn traverse_signature(&mut self, signature: &[SignatureItem]) {
        let mut cursor = Cursor::new();
        self.visit_signature(&mut cursor, signature);
    }

    /// Entry point for a toplevel phrase.
    fn traverse_phrase(&mut self, phrase: &ToplevelPhrase) {
        let mut cursor = Cursor::new();
        self.visit_toplevel_phrase(&mut cursor, phrase);
    }

    fn visit_toplevel_phrase(&mut self, cursor: &mut Cursor, phrase: &ToplevelPhrase) {
        walker::walk_toplevel_phrase(self, cursor, phrase);
    }

    // Modules

    fn visit_structure(&mut self, cursor: &mut Cursor, items: &[StructureItem]) {
        walker::walk_structure(self, cursor, items);
    }

    fn visit_structure_item(&mut self, cursor: &mut Cursor, item: &StructureItem) {
        walker::walk_structure_item(self, cursor, item);
    }

    fn visit_signature(&mut self, cursor: &mut Cursor, items: &[SignatureItem]) {
        walker::walk_signature(self, cursor, items);
    }

    fn visit_signature_item(&mut self, cursor: &mut Cursor, item: &SignatureItem) {
        walker::walk_signature_item(self, cursor, item);
    }

    fn visit_module_expr(&mut self, cursor: &mut Cursor, module: &ModuleExpr) {
        walker::walk_module_expr(self, cursor, module);
    }

    fn visit_module_type(&mut self, cursor: &mut Cursor, module_type: &ModuleType) {
        walker::walk_module_type(self, cursor, module_type);
    }

    fn visit_with_constraint(&mut self, cursor: &mut Cursor, constraint: &WithConstraint) {
        walker::walk_with_constraint(self, cursor, constraint);
    }

    fn visit_module_binding(&mut self, cursor: &mut Cursor, binding: &ModuleBinding) {
        walker::walk_module_binding(self, cursor, binding);
    }

    fn visit_module_declaration(&mut self, cursor: &mut Cursor, decl: &ModuleDeclaration) {
        walker::walk_module_declaration(self, cursor, decl);
    }

    fn visit_module_type_declaration(
        &mut self,
        cursor: &mut Cursor,
        decl: &ModuleTypeDeclaration,
    ) {
        walker::walk_module_type_declaration(self, cursor, decl);
    }

    fn visit_open_description(&mut self, cursor: &mut Cursor, desc: &OpenDescription) {
        walker::walk_open_description(self, cursor, desc);
    }

    // Declarations

    fn visit_value_description(&mut self, cursor: &mut Cursor, desc: &ValueDescription) {
        walker::walk_value_description(self, cursor, desc);
    }

    fn visit_type_declaration(&mut self, cursor: &mut Cursor, decl: &TypeDeclaration) {
        walker::walk_type_declaration(self, cursor, decl);
    }

    fn visit_constructor_declaration(
        &mut self,
        cursor: &mut Cursor,
        decl: &ConstructorDeclaration,
    ) {
        walker::walk_constructor_declaration(self, cursor, decl);
    }

    fn visit_label_declaration(&mut self, cursor: &mut Cursor, decl: &LabelDeclaration) {
        walker::walk_label_declaration(self, cursor, decl);
    }

    // Classes

    fn visit_class_declaration(&mut self, cursor: &mut Cursor, decl: &ClassDeclaration) {
        walker::walk_class_declaration(self, cursor, decl);
    }

    /// Class descriptions and class type declarations share this shape.
    fn visit_class_description(&mut self, cursor: &mut Cursor, desc: &ClassDescription) {
        walker::walk_class_description(self, cursor, desc);
    }

    fn visit_class_expr(&mut self, cursor: &mut Cursor, class_expr: &ClassExpr) {
        walker::walk_class_expr(self, cursor, class_expr);
    }

    fn visit_class_structure(&mut self, cursor: &mut Cursor, structure: &ClassStructure) {
        walker::walk_class_structure(self, cursor, structure);
    }

    fn visit_class_field(&mut self, cursor: &mut Cursor, field: &ClassField) {
        walker::walk_class_field(self, cursor, field);
    }

    fn visit_class_type(&mut self, cursor: &mut Cursor, class_type: &ClassType) {
        walker::walk_class_type(self, cursor, class_type);
    }

    fn visit_class_signature(&mut self, cursor: &mut Cursor, signature: &ClassSignature) {
        walker::walk_class_signature(self, cursor, signature);
    }

    fn visit_class_type_field(&mut self, cursor: &mut Cursor, field: &ClassTypeField) {
        walker::walk_class_type_field(self, cursor, field);
    }

    // Values

    fn visit_value_binding(&mut self, cursor: &mut Cursor, binding: &ValueBinding) {
        walker::walk_value_binding(self, cursor, binding);
    }

    fn visit_case(&mut self, cursor: &mut Cursor, case: &Case) {
        walker::walk_case(self, cursor, case);
    }

    fn visit_expression(&mut self, cursor: &mut Cursor, expr: &Expression) {
        walker::walk_expression(self, cursor, expr);
    }

    fn visit_pattern(&mut self, cursor: &mut Cursor, pattern: &Pattern) {
        walker::walk_pattern(self, cursor, pattern);
    }

    fn visit_core_type(&mut self, cursor: &mut Cursor, ty: &CoreType) {
        walker::walk_core_type(self, cursor, ty);
    }

    // Escape hatches

    fn visit_attributes(&mut self, cursor: &mut Cursor, attributes: &[Attribute]) {
        for attribute in attributes {
            self.visit_attribute(cursor, attribute);
        }
    }

    fn visit_attribute(&mut self, cursor: &mut Cursor, attribute: &Attribute) {
        walker::walk_attribute(self, cursor, attribute);
    }

    fn visit_extension(&mut self, cursor: &mut Cursor, extension: &Extension) {
        walker::walk_extension(self, cursor, extension);
    }
}
