//! Default descent for [`Visitor`].
//!
//! Every `match` here is exhaustive: a new variant in any layer stops
//! the crate from compiling until the walker knows how to descend into it.

use super::cursor::Cursor;
use super::visitor::Visitor;
use crate::attributes::{Attribute, Extension};
use crate::class::{
    ClassDeclaration, ClassDescription, ClassExpr, ClassExprDesc, ClassField, ClassFieldDesc,
    ClassFieldKind, ClassSignature, ClassStructure, ClassType, ClassTypeDesc, ClassTypeField,
    ClassTypeFieldDesc,
};
use crate::core_type::{CoreType, CoreTypeDesc, RowField};
use crate::declarations::{
    ConstructorDeclaration, LabelDeclaration, TypeDeclaration, TypeKind, ValueDescription,
};
use crate::expression::{Case, Expression, ExpressionDesc, ValueBinding};
use crate::module::{
    ModuleBinding, ModuleDeclaration, ModuleExpr, ModuleExprDesc, ModuleType,
    ModuleTypeDeclaration, ModuleTypeDesc, OpenDescription, SignatureItem, SignatureItemDesc,
    StructureItem, StructureItemDesc, WithConstraint,
};
use crate::pattern::{Pattern, PatternDesc};
use crate::toplevel::ToplevelPhrase;
use crate::variants::VariantSet;

pub fn walk_toplevel_phrase<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    phrase: &ToplevelPhrase,
) {
    match phrase {
        ToplevelPhrase::Definitions { structure } => visitor.visit_structure(cursor, structure),
        ToplevelPhrase::Directive { .. } => {}
    }
}

// =============================================================================
// Modules
// =============================================================================

pub fn walk_structure<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, items: &[StructureItem]) {
    for (index, item) in items.iter().enumerate() {
        cursor.enter(index.to_string());
        visitor.visit_structure_item(cursor, item);
        cursor.exit();
    }
}

pub fn walk_structure_item<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, item: &StructureItem) {
    cursor.enter(item.desc.variant_name());
    visitor.visit_attributes(cursor, &item.attributes);
    match &item.desc {
        StructureItemDesc::Eval { expr } => visitor.visit_expression(cursor, expr),
        StructureItemDesc::Value { bindings, .. } => {
            for binding in bindings {
                visitor.visit_value_binding(cursor, binding);
            }
        }
        StructureItemDesc::Primitive { desc } => visitor.visit_value_description(cursor, desc),
        StructureItemDesc::Type { decls, .. } => {
            for decl in decls {
                visitor.visit_type_declaration(cursor, decl);
            }
        }
        StructureItemDesc::Exception { decl } => visitor.visit_constructor_declaration(cursor, decl),
        StructureItemDesc::ExceptionRebind { attributes, .. } => {
            visitor.visit_attributes(cursor, attributes)
        }
        StructureItemDesc::Module { binding } => visitor.visit_module_binding(cursor, binding),
        StructureItemDesc::RecModule { bindings } => {
            for binding in bindings {
                visitor.visit_module_binding(cursor, binding);
            }
        }
        StructureItemDesc::ModuleType { decl } => {
            visitor.visit_module_type_declaration(cursor, decl)
        }
        StructureItemDesc::Open { desc } => visitor.visit_open_description(cursor, desc),
        StructureItemDesc::Class { decls } => {
            for decl in decls {
                visitor.visit_class_declaration(cursor, decl);
            }
        }
        StructureItemDesc::ClassType { decls } => {
            for decl in decls {
                visitor.visit_class_description(cursor, decl);
            }
        }
        StructureItemDesc::Include { decl } => {
            visitor.visit_attributes(cursor, &decl.attributes);
            visitor.visit_module_expr(cursor, &decl.item);
        }
        StructureItemDesc::Attribute { attribute } => visitor.visit_attribute(cursor, attribute),
        StructureItemDesc::Extension { extension } => visitor.visit_extension(cursor, extension),
    }
    cursor.exit();
}

pub fn walk_signature<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, items: &[SignatureItem]) {
    for (index, item) in items.iter().enumerate() {
        cursor.enter(index.to_string());
        visitor.visit_signature_item(cursor, item);
        cursor.exit();
    }
}

pub fn walk_signature_item<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, item: &SignatureItem) {
    cursor.enter(item.desc.variant_name());
    visitor.visit_attributes(cursor, &item.attributes);
    match &item.desc {
        SignatureItemDesc::Value { desc } => visitor.visit_value_description(cursor, desc),
        SignatureItemDesc::Type { decls, .. } => {
            for decl in decls {
                visitor.visit_type_declaration(cursor, decl);
            }
        }
        SignatureItemDesc::Exception { decl } => visitor.visit_constructor_declaration(cursor, decl),
        SignatureItemDesc::Module { decl } => visitor.visit_module_declaration(cursor, decl),
        SignatureItemDesc::RecModule { decls } => {
            for decl in decls {
                visitor.visit_module_declaration(cursor, decl);
            }
        }
        SignatureItemDesc::ModuleType { decl } => {
            visitor.visit_module_type_declaration(cursor, decl)
        }
        SignatureItemDesc::Open { desc } => visitor.visit_open_description(cursor, desc),
        SignatureItemDesc::Include { desc } => {
            visitor.visit_attributes(cursor, &desc.attributes);
            visitor.visit_module_type(cursor, &desc.item);
        }
        SignatureItemDesc::Class { decls } | SignatureItemDesc::ClassType { decls } => {
            for decl in decls {
                visitor.visit_class_description(cursor, decl);
            }
        }
        SignatureItemDesc::Attribute { attribute } => visitor.visit_attribute(cursor, attribute),
        SignatureItemDesc::Extension { extension } => visitor.visit_extension(cursor, extension),
    }
    cursor.exit();
}

pub fn walk_module_expr<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, module: &ModuleExpr) {
    cursor.enter(module.desc.variant_name());
    visitor.visit_attributes(cursor, &module.attributes);
    match &module.desc {
        ModuleExprDesc::Ident { .. } => {}
        ModuleExprDesc::Structure { items } => visitor.visit_structure(cursor, items),
        ModuleExprDesc::Functor {
            param_type, body, ..
        } => {
            if let Some(param_type) = param_type {
                visitor.visit_module_type(cursor, param_type);
            }
            visitor.visit_module_expr(cursor, body);
        }
        ModuleExprDesc::Apply { functor, arg } => {
            visitor.visit_module_expr(cursor, functor);
            visitor.visit_module_expr(cursor, arg);
        }
        ModuleExprDesc::Constraint {
            module,
            module_type,
        } => {
            visitor.visit_module_expr(cursor, module);
            visitor.visit_module_type(cursor, module_type);
        }
        ModuleExprDesc::Unpack { expr } => visitor.visit_expression(cursor, expr),
        ModuleExprDesc::Extension { extension } => visitor.visit_extension(cursor, extension),
    }
    cursor.exit();
}

pub fn walk_module_type<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    module_type: &ModuleType,
) {
    cursor.enter(module_type.desc.variant_name());
    visitor.visit_attributes(cursor, &module_type.attributes);
    match &module_type.desc {
        ModuleTypeDesc::Ident { .. } => {}
        ModuleTypeDesc::Signature { items } => visitor.visit_signature(cursor, items),
        ModuleTypeDesc::Functor {
            param_type, body, ..
        } => {
            if let Some(param_type) = param_type {
                visitor.visit_module_type(cursor, param_type);
            }
            visitor.visit_module_type(cursor, body);
        }
        ModuleTypeDesc::With {
            module_type,
            constraints,
        } => {
            visitor.visit_module_type(cursor, module_type);
            for constraint in constraints {
                visitor.visit_with_constraint(cursor, constraint);
            }
        }
        ModuleTypeDesc::TypeOf { module } => visitor.visit_module_expr(cursor, module),
        ModuleTypeDesc::Extension { extension } => visitor.visit_extension(cursor, extension),
    }
    cursor.exit();
}

pub fn walk_with_constraint<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    constraint: &WithConstraint,
) {
    match constraint {
        WithConstraint::Type { decl, .. } | WithConstraint::TypeSubst { decl } => {
            visitor.visit_type_declaration(cursor, decl)
        }
        WithConstraint::Module { .. } | WithConstraint::ModuleSubst { .. } => {}
    }
}

pub fn walk_module_binding<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    binding: &ModuleBinding,
) {
    visitor.visit_attributes(cursor, &binding.attributes);
    visitor.visit_module_expr(cursor, &binding.expr);
}

pub fn walk_module_declaration<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    decl: &ModuleDeclaration,
) {
    visitor.visit_attributes(cursor, &decl.attributes);
    visitor.visit_module_type(cursor, &decl.module_type);
}

pub fn walk_module_type_declaration<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    decl: &ModuleTypeDeclaration,
) {
    visitor.visit_attributes(cursor, &decl.attributes);
    if let Some(module_type) = &decl.module_type {
        visitor.visit_module_type(cursor, module_type);
    }
}

pub fn walk_open_description<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    desc: &OpenDescription,
) {
    visitor.visit_attributes(cursor, &desc.attributes);
}

// =============================================================================
// Declarations
// =============================================================================

pub fn walk_value_description<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    desc: &ValueDescription,
) {
    visitor.visit_attributes(cursor, &desc.attributes);
    visitor.visit_core_type(cursor, &desc.ty);
}

pub fn walk_type_declaration<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    decl: &TypeDeclaration,
) {
    visitor.visit_attributes(cursor, &decl.attributes);
    for constraint in &decl.constraints {
        visitor.visit_core_type(cursor, &constraint.lhs);
        visitor.visit_core_type(cursor, &constraint.rhs);
    }
    match &decl.kind {
        TypeKind::Abstract => {}
        TypeKind::Variant { constructors } => {
            for constructor in constructors {
                visitor.visit_constructor_declaration(cursor, constructor);
            }
        }
        TypeKind::Record { labels } => {
            for label in labels {
                visitor.visit_label_declaration(cursor, label);
            }
        }
    }
    if let Some(manifest) = &decl.manifest {
        visitor.visit_core_type(cursor, manifest);
    }
}

pub fn walk_constructor_declaration<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    decl: &ConstructorDeclaration,
) {
    visitor.visit_attributes(cursor, &decl.attributes);
    for arg in &decl.args {
        visitor.visit_core_type(cursor, arg);
    }
    if let Some(res) = &decl.res {
        visitor.visit_core_type(cursor, res);
    }
}

pub fn walk_label_declaration<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    decl: &LabelDeclaration,
) {
    visitor.visit_attributes(cursor, &decl.attributes);
    visitor.visit_core_type(cursor, &decl.ty);
}

// =============================================================================
// Classes
// =============================================================================

pub fn walk_class_declaration<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    decl: &ClassDeclaration,
) {
    visitor.visit_attributes(cursor, &decl.attributes);
    visitor.visit_class_expr(cursor, &decl.expr);
}

pub fn walk_class_description<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    desc: &ClassDescription,
) {
    visitor.visit_attributes(cursor, &desc.attributes);
    visitor.visit_class_type(cursor, &desc.expr);
}

pub fn walk_class_expr<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, class_expr: &ClassExpr) {
    cursor.enter(class_expr.desc.variant_name());
    visitor.visit_attributes(cursor, &class_expr.attributes);
    match &class_expr.desc {
        ClassExprDesc::Constr { args, .. } => {
            for arg in args {
                visitor.visit_core_type(cursor, arg);
            }
        }
        ClassExprDesc::Structure { structure } => visitor.visit_class_structure(cursor, structure),
        ClassExprDesc::Fun {
            default,
            pattern,
            body,
            ..
        } => {
            if let Some(default) = default {
                visitor.visit_expression(cursor, default);
            }
            visitor.visit_pattern(cursor, pattern);
            visitor.visit_class_expr(cursor, body);
        }
        ClassExprDesc::Apply { class_expr, args } => {
            visitor.visit_class_expr(cursor, class_expr);
            for (_, arg) in args {
                visitor.visit_expression(cursor, arg);
            }
        }
        ClassExprDesc::Let { bindings, body, .. } => {
            for binding in bindings {
                visitor.visit_value_binding(cursor, binding);
            }
            visitor.visit_class_expr(cursor, body);
        }
        ClassExprDesc::Constraint {
            class_expr,
            class_type,
        } => {
            visitor.visit_class_expr(cursor, class_expr);
            visitor.visit_class_type(cursor, class_type);
        }
        ClassExprDesc::Extension { extension } => visitor.visit_extension(cursor, extension),
    }
    cursor.exit();
}

pub fn walk_class_structure<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    structure: &ClassStructure,
) {
    visitor.visit_pattern(cursor, &structure.self_pattern);
    for field in &structure.fields {
        visitor.visit_class_field(cursor, field);
    }
}

pub fn walk_class_field<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, field: &ClassField) {
    cursor.enter(field.desc.variant_name());
    visitor.visit_attributes(cursor, &field.attributes);
    match &field.desc {
        ClassFieldDesc::Inherit { class_expr, .. } => visitor.visit_class_expr(cursor, class_expr),
        ClassFieldDesc::Val { member, .. } | ClassFieldDesc::Method { member, .. } => match member {
            ClassFieldKind::Virtual { ty } => visitor.visit_core_type(cursor, ty),
            ClassFieldKind::Concrete { expr, .. } => visitor.visit_expression(cursor, expr),
        },
        ClassFieldDesc::Constraint { lhs, rhs } => {
            visitor.visit_core_type(cursor, lhs);
            visitor.visit_core_type(cursor, rhs);
        }
        ClassFieldDesc::Initializer { expr } => visitor.visit_expression(cursor, expr),
        ClassFieldDesc::Attribute { attribute } => visitor.visit_attribute(cursor, attribute),
        ClassFieldDesc::Extension { extension } => visitor.visit_extension(cursor, extension),
    }
    cursor.exit();
}

pub fn walk_class_type<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, class_type: &ClassType) {
    cursor.enter(class_type.desc.variant_name());
    visitor.visit_attributes(cursor, &class_type.attributes);
    match &class_type.desc {
        ClassTypeDesc::Constr { args, .. } => {
            for arg in args {
                visitor.visit_core_type(cursor, arg);
            }
        }
        ClassTypeDesc::Signature { signature } => visitor.visit_class_signature(cursor, signature),
        ClassTypeDesc::Arrow { arg, ret, .. } => {
            visitor.visit_core_type(cursor, arg);
            visitor.visit_class_type(cursor, ret);
        }
        ClassTypeDesc::Extension { extension } => visitor.visit_extension(cursor, extension),
    }
    cursor.exit();
}

pub fn walk_class_signature<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    signature: &ClassSignature,
) {
    visitor.visit_core_type(cursor, &signature.self_type);
    for field in &signature.fields {
        visitor.visit_class_type_field(cursor, field);
    }
}

pub fn walk_class_type_field<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    field: &ClassTypeField,
) {
    cursor.enter(field.desc.variant_name());
    visitor.visit_attributes(cursor, &field.attributes);
    match &field.desc {
        ClassTypeFieldDesc::Inherit { class_type } => visitor.visit_class_type(cursor, class_type),
        ClassTypeFieldDesc::Val { ty, .. } | ClassTypeFieldDesc::Method { ty, .. } => {
            visitor.visit_core_type(cursor, ty)
        }
        ClassTypeFieldDesc::Constraint { lhs, rhs } => {
            visitor.visit_core_type(cursor, lhs);
            visitor.visit_core_type(cursor, rhs);
        }
        ClassTypeFieldDesc::Attribute { attribute } => visitor.visit_attribute(cursor, attribute),
        ClassTypeFieldDesc::Extension { extension } => visitor.visit_extension(cursor, extension),
    }
    cursor.exit();
}

// =============================================================================
// Values
// =============================================================================

pub fn walk_value_binding<V: Visitor>(
    visitor: &mut V,
    cursor: &mut Cursor,
    binding: &ValueBinding,
) {
    visitor.visit_attributes(cursor, &binding.attributes);
    visitor.visit_pattern(cursor, &binding.pattern);
    visitor.visit_expression(cursor, &binding.expr);
}

pub fn walk_case<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, case: &Case) {
    visitor.visit_pattern(cursor, &case.pattern);
    if let Some(guard) = &case.guard {
        visitor.visit_expression(cursor, guard);
    }
    visitor.visit_expression(cursor, &case.body);
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, expr: &Expression) {
    cursor.enter(expr.desc.variant_name());
    visitor.visit_attributes(cursor, &expr.attributes);
    match &expr.desc {
        ExpressionDesc::Ident { .. }
        | ExpressionDesc::Constant { .. }
        | ExpressionDesc::New { .. }
        | ExpressionDesc::AssertFalse => {}
        ExpressionDesc::Let { bindings, body, .. } => {
            for binding in bindings {
                visitor.visit_value_binding(cursor, binding);
            }
            visitor.visit_expression(cursor, body);
        }
        ExpressionDesc::Function { default, cases, .. } => {
            if let Some(default) = default {
                visitor.visit_expression(cursor, default);
            }
            for case in cases {
                visitor.visit_case(cursor, case);
            }
        }
        ExpressionDesc::Apply { callee, args } => {
            visitor.visit_expression(cursor, callee);
            for (_, arg) in args {
                visitor.visit_expression(cursor, arg);
            }
        }
        ExpressionDesc::Match {
            scrutinee: subject,
            cases,
        }
        | ExpressionDesc::Try {
            body: subject,
            cases,
        } => {
            visitor.visit_expression(cursor, subject);
            for case in cases {
                visitor.visit_case(cursor, case);
            }
        }
        ExpressionDesc::Tuple { elements } => {
            for element in elements {
                visitor.visit_expression(cursor, element);
            }
        }
        ExpressionDesc::Array { elements } => {
            for element in elements {
                visitor.visit_expression(cursor, element);
            }
        }
        ExpressionDesc::Construct { arg, .. } | ExpressionDesc::Variant { arg, .. } => {
            if let Some(arg) = arg {
                visitor.visit_expression(cursor, arg);
            }
        }
        ExpressionDesc::Record { fields, base } => {
            for (_, value) in fields {
                visitor.visit_expression(cursor, value);
            }
            if let Some(base) = base {
                visitor.visit_expression(cursor, base);
            }
        }
        ExpressionDesc::Field { record, .. } => visitor.visit_expression(cursor, record),
        ExpressionDesc::SetField { record, value, .. } => {
            visitor.visit_expression(cursor, record);
            visitor.visit_expression(cursor, value);
        }
        ExpressionDesc::IfThenElse {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expression(cursor, cond);
            visitor.visit_expression(cursor, then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_expression(cursor, else_branch);
            }
        }
        ExpressionDesc::Sequence { first, second } => {
            visitor.visit_expression(cursor, first);
            visitor.visit_expression(cursor, second);
        }
        ExpressionDesc::While { cond, body } => {
            visitor.visit_expression(cursor, cond);
            visitor.visit_expression(cursor, body);
        }
        ExpressionDesc::For {
            start, stop, body, ..
        } => {
            visitor.visit_expression(cursor, start);
            visitor.visit_expression(cursor, stop);
            visitor.visit_expression(cursor, body);
        }
        ExpressionDesc::Constraint { expr, constraint } => {
            visitor.visit_expression(cursor, expr);
            let (annotation, coercion) = constraint.parts();
            if let Some(ty) = annotation {
                visitor.visit_core_type(cursor, ty);
            }
            if let Some(ty) = coercion {
                visitor.visit_core_type(cursor, ty);
            }
        }
        ExpressionDesc::Send { object, .. } => visitor.visit_expression(cursor, object),
        ExpressionDesc::SetInstVar { value, .. } => visitor.visit_expression(cursor, value),
        ExpressionDesc::Override { fields } => {
            for (_, value) in fields {
                visitor.visit_expression(cursor, value);
            }
        }
        ExpressionDesc::LetModule { module, body, .. } => {
            visitor.visit_module_expr(cursor, module);
            visitor.visit_expression(cursor, body);
        }
        ExpressionDesc::Assert { cond } => visitor.visit_expression(cursor, cond),
        ExpressionDesc::Lazy { expr } => visitor.visit_expression(cursor, expr),
        ExpressionDesc::Poly { expr, ty } => {
            visitor.visit_expression(cursor, expr);
            if let Some(ty) = ty {
                visitor.visit_core_type(cursor, ty);
            }
        }
        ExpressionDesc::Object { structure } => visitor.visit_class_structure(cursor, structure),
        ExpressionDesc::NewType { body, .. } => visitor.visit_expression(cursor, body),
        ExpressionDesc::Pack { module } => visitor.visit_module_expr(cursor, module),
        ExpressionDesc::Open { body, .. } => visitor.visit_expression(cursor, body),
        ExpressionDesc::Extension { extension } => visitor.visit_extension(cursor, extension),
    }
    cursor.exit();
}

pub fn walk_pattern<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, pattern: &Pattern) {
    cursor.enter(pattern.desc.variant_name());
    visitor.visit_attributes(cursor, &pattern.attributes);
    match &pattern.desc {
        PatternDesc::Any
        | PatternDesc::Var { .. }
        | PatternDesc::Constant { .. }
        | PatternDesc::Type { .. }
        | PatternDesc::Unpack { .. } => {}
        PatternDesc::Alias { pattern, .. } | PatternDesc::Lazy { pattern } => {
            visitor.visit_pattern(cursor, pattern)
        }
        PatternDesc::Tuple { elements } => {
            for element in elements {
                visitor.visit_pattern(cursor, element);
            }
        }
        PatternDesc::Array { elements } => {
            for element in elements {
                visitor.visit_pattern(cursor, element);
            }
        }
        PatternDesc::Construct { arg, .. } | PatternDesc::Variant { arg, .. } => {
            if let Some(arg) = arg {
                visitor.visit_pattern(cursor, arg);
            }
        }
        PatternDesc::Record { fields, .. } => {
            for (_, field) in fields {
                visitor.visit_pattern(cursor, field);
            }
        }
        PatternDesc::Or { left, right } => {
            visitor.visit_pattern(cursor, left);
            visitor.visit_pattern(cursor, right);
        }
        PatternDesc::Constraint { pattern, ty } => {
            visitor.visit_pattern(cursor, pattern);
            visitor.visit_core_type(cursor, ty);
        }
        PatternDesc::Extension { extension } => visitor.visit_extension(cursor, extension),
    }
    cursor.exit();
}

pub fn walk_core_type<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, ty: &CoreType) {
    cursor.enter(ty.desc.variant_name());
    visitor.visit_attributes(cursor, &ty.attributes);
    match &ty.desc {
        CoreTypeDesc::Any | CoreTypeDesc::Var { .. } => {}
        CoreTypeDesc::Arrow { arg, ret, .. } => {
            visitor.visit_core_type(cursor, arg);
            visitor.visit_core_type(cursor, ret);
        }
        CoreTypeDesc::Tuple { elements } => {
            for element in elements {
                visitor.visit_core_type(cursor, element);
            }
        }
        CoreTypeDesc::Constr { args, .. } | CoreTypeDesc::Class { args, .. } => {
            for arg in args {
                visitor.visit_core_type(cursor, arg);
            }
        }
        CoreTypeDesc::Object { fields, .. } => {
            for field in fields {
                visitor.visit_core_type(cursor, &field.ty);
            }
        }
        CoreTypeDesc::Alias { ty, .. } | CoreTypeDesc::Poly { ty, .. } => {
            visitor.visit_core_type(cursor, ty)
        }
        CoreTypeDesc::Variant { fields, .. } => {
            for field in fields {
                match field {
                    RowField::Tag { types, .. } => {
                        for ty in types {
                            visitor.visit_core_type(cursor, ty);
                        }
                    }
                    RowField::Inherit { ty } => visitor.visit_core_type(cursor, ty),
                }
            }
        }
        CoreTypeDesc::Package { package } => {
            for (_, ty) in &package.constraints {
                visitor.visit_core_type(cursor, ty);
            }
        }
        CoreTypeDesc::Extension { extension } => visitor.visit_extension(cursor, extension),
    }
    cursor.exit();
}

// =============================================================================
// Attributes and extensions
// =============================================================================

pub fn walk_attribute<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, attribute: &Attribute) {
    cursor.enter(format!("@{}", attribute.name.txt));
    visitor.visit_expression(cursor, &attribute.payload);
    cursor.exit();
}

pub fn walk_extension<V: Visitor>(visitor: &mut V, cursor: &mut Cursor, extension: &Extension) {
    cursor.enter(format!("%{}", extension.name.txt));
    visitor.visit_expression(cursor, &extension.payload);
    cursor.exit();
}
