//! Owned rewriting of trees.
//!
//! Unlike the read-only [`super::Visitor`], a [`Mapper`] consumes a tree and
//! produces a new one. Each method defaults to a `walk_map_*` function that
//! rebuilds the node from its mapped children, so an implementor overrides
//! only the node kinds it rewrites.
//!
//! Spans of nodes and declaration records go through
//! [`Mapper::map_location`]; located names keep their spans.
//!
//! # Example
//!
//! ```
//! use std::convert::Infallible;
//! use parsetree::{Expression, ExpressionDesc, Longident, Location, Mapper};
//! use parsetree::traversal::walk_map_expression;
//!
//! /// Renames every `x` to `y`.
//! struct Rename;
//!
//! impl Mapper for Rename {
//!     type Error = Infallible;
//!
//!     fn map_expression(&mut self, expr: Expression) -> Result<Expression, Infallible> {
//!         match &expr.desc {
//!             ExpressionDesc::Ident { lid } if lid.txt == Longident::ident("x") => {
//!                 Ok(Expression::ident(expr.loc, Longident::ident("y")))
//!             }
//!             _ => walk_map_expression(self, expr),
//!         }
//!     }
//! }
//!
//! let renamed = Rename
//!     .map_expression(Expression::ident(Location::none(), Longident::ident("x")))
//!     .unwrap();
//! assert!(matches!(renamed.desc, ExpressionDesc::Ident { lid } if lid.txt.last() == "y"));
//! ```

use crate::attributes::{Attribute, Attributes, Extension};
use crate::class::{
    ClassDeclaration, ClassDescription, ClassExpr, ClassExprDesc, ClassField, ClassFieldDesc,
    ClassFieldKind, ClassInfos, ClassSignature, ClassStructure, ClassType, ClassTypeDesc,
    ClassTypeField, ClassTypeFieldDesc,
};
use crate::core_type::{CoreType, CoreTypeDesc, ObjectField, PackageType, RowField};
use crate::declarations::{
    ConstructorDeclaration, LabelDeclaration, TypeDeclaration, TypeKind, TypeParamConstraint,
    ValueDescription,
};
use crate::expression::{Case, Expression, ExpressionDesc, TypeConstraint, ValueBinding};
use crate::location::Location;
use crate::module::{
    IncludeInfos, ModuleBinding, ModuleDeclaration, ModuleExpr, ModuleExprDesc, ModuleType,
    ModuleTypeDeclaration, ModuleTypeDesc, OpenDescription, Signature, SignatureItem,
    SignatureItemDesc, Structure, StructureItem, StructureItemDesc, WithConstraint,
};
use crate::node::Node;
use crate::pattern::{Pattern, PatternDesc};
use crate::toplevel::ToplevelPhrase;

type MapResult<T, M> = Result<T, <M as Mapper>::Error>;

/// Tree-to-tree rewrite over every node kind.
pub trait Mapper {
    /// Error type for rewrite failures; `std::convert::Infallible` when a
    /// rewrite cannot fail.
    type Error;

    fn map_location(&mut self, loc: Location) -> Result<Location, Self::Error> {
        Ok(loc)
    }

    fn map_toplevel_phrase(&mut self, phrase: ToplevelPhrase) -> Result<ToplevelPhrase, Self::Error> {
        walk_map_toplevel_phrase(self, phrase)
    }

    // Modules

    fn map_structure(&mut self, items: Structure) -> Result<Structure, Self::Error> {
        items
            .into_iter()
            .map(|item| self.map_structure_item(item))
            .collect()
    }

    fn map_structure_item(&mut self, item: StructureItem) -> Result<StructureItem, Self::Error> {
        walk_map_structure_item(self, item)
    }

    fn map_signature(&mut self, items: Signature) -> Result<Signature, Self::Error> {
        items
            .into_iter()
            .map(|item| self.map_signature_item(item))
            .collect()
    }

    fn map_signature_item(&mut self, item: SignatureItem) -> Result<SignatureItem, Self::Error> {
        walk_map_signature_item(self, item)
    }

    fn map_module_expr(&mut self, module: ModuleExpr) -> Result<ModuleExpr, Self::Error> {
        walk_map_module_expr(self, module)
    }

    fn map_module_type(&mut self, module_type: ModuleType) -> Result<ModuleType, Self::Error> {
        walk_map_module_type(self, module_type)
    }

    fn map_with_constraint(
        &mut self,
        constraint: WithConstraint,
    ) -> Result<WithConstraint, Self::Error> {
        walk_map_with_constraint(self, constraint)
    }

    fn map_module_binding(&mut self, binding: ModuleBinding) -> Result<ModuleBinding, Self::Error> {
        Ok(ModuleBinding {
            name: binding.name,
            expr: self.map_module_expr(binding.expr)?,
            loc: self.map_location(binding.loc)?,
            attributes: self.map_attributes(binding.attributes)?,
        })
    }

    fn map_module_declaration(
        &mut self,
        decl: ModuleDeclaration,
    ) -> Result<ModuleDeclaration, Self::Error> {
        Ok(ModuleDeclaration {
            name: decl.name,
            module_type: self.map_module_type(decl.module_type)?,
            loc: self.map_location(decl.loc)?,
            attributes: self.map_attributes(decl.attributes)?,
        })
    }

    fn map_module_type_declaration(
        &mut self,
        decl: ModuleTypeDeclaration,
    ) -> Result<ModuleTypeDeclaration, Self::Error> {
        Ok(ModuleTypeDeclaration {
            name: decl.name,
            module_type: decl
                .module_type
                .map(|mt| self.map_module_type(mt))
                .transpose()?,
            loc: self.map_location(decl.loc)?,
            attributes: self.map_attributes(decl.attributes)?,
        })
    }

    fn map_open_description(
        &mut self,
        desc: OpenDescription,
    ) -> Result<OpenDescription, Self::Error> {
        Ok(OpenDescription {
            loc: self.map_location(desc.loc)?,
            attributes: self.map_attributes(desc.attributes)?,
            ..desc
        })
    }

    // Declarations

    fn map_value_description(
        &mut self,
        desc: ValueDescription,
    ) -> Result<ValueDescription, Self::Error> {
        Ok(ValueDescription {
            name: desc.name,
            ty: self.map_core_type(desc.ty)?,
            prim: desc.prim,
            loc: self.map_location(desc.loc)?,
            attributes: self.map_attributes(desc.attributes)?,
        })
    }

    fn map_type_declaration(
        &mut self,
        decl: TypeDeclaration,
    ) -> Result<TypeDeclaration, Self::Error> {
        walk_map_type_declaration(self, decl)
    }

    fn map_constructor_declaration(
        &mut self,
        decl: ConstructorDeclaration,
    ) -> Result<ConstructorDeclaration, Self::Error> {
        Ok(ConstructorDeclaration {
            name: decl.name,
            args: decl
                .args
                .into_iter()
                .map(|ty| self.map_core_type(ty))
                .collect::<Result<_, _>>()?,
            res: decl.res.map(|ty| self.map_core_type(ty)).transpose()?,
            loc: self.map_location(decl.loc)?,
            attributes: self.map_attributes(decl.attributes)?,
        })
    }

    fn map_label_declaration(
        &mut self,
        decl: LabelDeclaration,
    ) -> Result<LabelDeclaration, Self::Error> {
        Ok(LabelDeclaration {
            name: decl.name,
            mutable: decl.mutable,
            ty: self.map_core_type(decl.ty)?,
            loc: self.map_location(decl.loc)?,
            attributes: self.map_attributes(decl.attributes)?,
        })
    }

    // Classes

    fn map_class_declaration(
        &mut self,
        decl: ClassDeclaration,
    ) -> Result<ClassDeclaration, Self::Error> {
        walk_map_class_infos(self, decl, |mapper, expr| mapper.map_class_expr(expr))
    }

    /// Class descriptions and class type declarations share this shape.
    fn map_class_description(
        &mut self,
        desc: ClassDescription,
    ) -> Result<ClassDescription, Self::Error> {
        walk_map_class_infos(self, desc, |mapper, ty| mapper.map_class_type(ty))
    }

    fn map_class_expr(&mut self, class_expr: ClassExpr) -> Result<ClassExpr, Self::Error> {
        walk_map_class_expr(self, class_expr)
    }

    fn map_class_structure(
        &mut self,
        structure: ClassStructure,
    ) -> Result<ClassStructure, Self::Error> {
        Ok(ClassStructure {
            self_pattern: self.map_pattern(structure.self_pattern)?,
            fields: structure
                .fields
                .into_iter()
                .map(|field| self.map_class_field(field))
                .collect::<Result<_, _>>()?,
        })
    }

    fn map_class_field(&mut self, field: ClassField) -> Result<ClassField, Self::Error> {
        walk_map_class_field(self, field)
    }

    fn map_class_type(&mut self, class_type: ClassType) -> Result<ClassType, Self::Error> {
        walk_map_class_type(self, class_type)
    }

    fn map_class_signature(
        &mut self,
        signature: ClassSignature,
    ) -> Result<ClassSignature, Self::Error> {
        Ok(ClassSignature {
            self_type: self.map_core_type(signature.self_type)?,
            fields: signature
                .fields
                .into_iter()
                .map(|field| self.map_class_type_field(field))
                .collect::<Result<_, _>>()?,
        })
    }

    fn map_class_type_field(
        &mut self,
        field: ClassTypeField,
    ) -> Result<ClassTypeField, Self::Error> {
        walk_map_class_type_field(self, field)
    }

    // Values

    fn map_value_binding(&mut self, binding: ValueBinding) -> Result<ValueBinding, Self::Error> {
        Ok(ValueBinding {
            pattern: self.map_pattern(binding.pattern)?,
            expr: self.map_expression(binding.expr)?,
            loc: self.map_location(binding.loc)?,
            attributes: self.map_attributes(binding.attributes)?,
        })
    }

    fn map_case(&mut self, case: Case) -> Result<Case, Self::Error> {
        Ok(Case {
            pattern: self.map_pattern(case.pattern)?,
            guard: case.guard.map(|g| self.map_expression(g)).transpose()?,
            body: self.map_expression(case.body)?,
        })
    }

    fn map_expression(&mut self, expr: Expression) -> Result<Expression, Self::Error> {
        walk_map_expression(self, expr)
    }

    fn map_pattern(&mut self, pattern: Pattern) -> Result<Pattern, Self::Error> {
        walk_map_pattern(self, pattern)
    }

    fn map_core_type(&mut self, ty: CoreType) -> Result<CoreType, Self::Error> {
        walk_map_core_type(self, ty)
    }

    // Escape hatches

    fn map_attributes(&mut self, attributes: Attributes) -> Result<Attributes, Self::Error> {
        attributes
            .into_iter()
            .map(|attribute| self.map_attribute(attribute))
            .collect()
    }

    fn map_attribute(&mut self, attribute: Attribute) -> Result<Attribute, Self::Error> {
        Ok(Attribute::new(
            attribute.name,
            self.map_expression(*attribute.payload)?,
        ))
    }

    fn map_extension(&mut self, extension: Extension) -> Result<Extension, Self::Error> {
        Ok(Extension::new(
            extension.name,
            self.map_expression(*extension.payload)?,
        ))
    }
}

/// Rebuild a node: span, then attributes, then the desc via `f`.
fn map_node<M, D>(
    mapper: &mut M,
    node: Node<D>,
    f: impl FnOnce(&mut M, D) -> MapResult<D, M>,
) -> MapResult<Node<D>, M>
where
    M: Mapper + ?Sized,
{
    let (desc, loc, attributes) = node.into_parts();
    let loc = mapper.map_location(loc)?;
    let attributes = mapper.map_attributes(attributes)?;
    let desc = f(mapper, desc)?;
    Ok(Node::new(desc, loc).with_attributes(attributes))
}

fn map_boxed<M, T>(
    mapper: &mut M,
    value: Box<T>,
    f: impl FnOnce(&mut M, T) -> MapResult<T, M>,
) -> MapResult<Box<T>, M>
where
    M: Mapper + ?Sized,
{
    f(mapper, *value).map(Box::new)
}

fn map_exprs<M: Mapper + ?Sized>(
    mapper: &mut M,
    exprs: Vec<Expression>,
) -> MapResult<Vec<Expression>, M> {
    exprs
        .into_iter()
        .map(|e| mapper.map_expression(e))
        .collect()
}

fn map_patterns<M: Mapper + ?Sized>(
    mapper: &mut M,
    patterns: Vec<Pattern>,
) -> MapResult<Vec<Pattern>, M> {
    patterns
        .into_iter()
        .map(|p| mapper.map_pattern(p))
        .collect()
}

fn map_types<M: Mapper + ?Sized>(mapper: &mut M, types: Vec<CoreType>) -> MapResult<Vec<CoreType>, M> {
    types
        .into_iter()
        .map(|ty| mapper.map_core_type(ty))
        .collect()
}

pub fn walk_map_toplevel_phrase<M: Mapper + ?Sized>(
    mapper: &mut M,
    phrase: ToplevelPhrase,
) -> MapResult<ToplevelPhrase, M> {
    Ok(match phrase {
        ToplevelPhrase::Definitions { structure } => ToplevelPhrase::Definitions {
            structure: mapper.map_structure(structure)?,
        },
        ToplevelPhrase::Directive {
            name,
            argument,
            loc,
        } => ToplevelPhrase::Directive {
            name,
            argument,
            loc: mapper.map_location(loc)?,
        },
    })
}

// =============================================================================
// Modules
// =============================================================================

pub fn walk_map_structure_item<M: Mapper + ?Sized>(
    mapper: &mut M,
    item: StructureItem,
) -> MapResult<StructureItem, M> {
    map_node(mapper, item, |mapper, desc| {
        Ok(match desc {
            StructureItemDesc::Eval { expr } => StructureItemDesc::Eval {
                expr: mapper.map_expression(expr)?,
            },
            StructureItemDesc::Value { rec_flag, bindings } => StructureItemDesc::Value {
                rec_flag,
                bindings: bindings.try_map(|b| mapper.map_value_binding(b))?,
            },
            StructureItemDesc::Primitive { desc } => StructureItemDesc::Primitive {
                desc: mapper.map_value_description(desc)?,
            },
            StructureItemDesc::Type { rec_flag, decls } => StructureItemDesc::Type {
                rec_flag,
                decls: decls.try_map(|d| mapper.map_type_declaration(d))?,
            },
            StructureItemDesc::Exception { decl } => StructureItemDesc::Exception {
                decl: mapper.map_constructor_declaration(decl)?,
            },
            StructureItemDesc::ExceptionRebind {
                name,
                lid,
                attributes,
            } => StructureItemDesc::ExceptionRebind {
                name,
                lid,
                attributes: mapper.map_attributes(attributes)?,
            },
            StructureItemDesc::Module { binding } => StructureItemDesc::Module {
                binding: mapper.map_module_binding(binding)?,
            },
            StructureItemDesc::RecModule { bindings } => StructureItemDesc::RecModule {
                bindings: bindings.try_map(|b| mapper.map_module_binding(b))?,
            },
            StructureItemDesc::ModuleType { decl } => StructureItemDesc::ModuleType {
                decl: mapper.map_module_type_declaration(decl)?,
            },
            StructureItemDesc::Open { desc } => StructureItemDesc::Open {
                desc: mapper.map_open_description(desc)?,
            },
            StructureItemDesc::Class { decls } => StructureItemDesc::Class {
                decls: decls.try_map(|d| mapper.map_class_declaration(d))?,
            },
            StructureItemDesc::ClassType { decls } => StructureItemDesc::ClassType {
                decls: decls.try_map(|d| mapper.map_class_description(d))?,
            },
            StructureItemDesc::Include { decl } => StructureItemDesc::Include {
                decl: walk_map_include(mapper, decl, |mapper, me| mapper.map_module_expr(me))?,
            },
            StructureItemDesc::Attribute { attribute } => StructureItemDesc::Attribute {
                attribute: mapper.map_attribute(attribute)?,
            },
            StructureItemDesc::Extension { extension } => StructureItemDesc::Extension {
                extension: mapper.map_extension(extension)?,
            },
        })
    })
}

pub fn walk_map_signature_item<M: Mapper + ?Sized>(
    mapper: &mut M,
    item: SignatureItem,
) -> MapResult<SignatureItem, M> {
    map_node(mapper, item, |mapper, desc| {
        Ok(match desc {
            SignatureItemDesc::Value { desc } => SignatureItemDesc::Value {
                desc: mapper.map_value_description(desc)?,
            },
            SignatureItemDesc::Type { rec_flag, decls } => SignatureItemDesc::Type {
                rec_flag,
                decls: decls.try_map(|d| mapper.map_type_declaration(d))?,
            },
            SignatureItemDesc::Exception { decl } => SignatureItemDesc::Exception {
                decl: mapper.map_constructor_declaration(decl)?,
            },
            SignatureItemDesc::Module { decl } => SignatureItemDesc::Module {
                decl: mapper.map_module_declaration(decl)?,
            },
            SignatureItemDesc::RecModule { decls } => SignatureItemDesc::RecModule {
                decls: decls.try_map(|d| mapper.map_module_declaration(d))?,
            },
            SignatureItemDesc::ModuleType { decl } => SignatureItemDesc::ModuleType {
                decl: mapper.map_module_type_declaration(decl)?,
            },
            SignatureItemDesc::Open { desc } => SignatureItemDesc::Open {
                desc: mapper.map_open_description(desc)?,
            },
            SignatureItemDesc::Include { desc } => SignatureItemDesc::Include {
                desc: walk_map_include(mapper, desc, |mapper, mt| mapper.map_module_type(mt))?,
            },
            SignatureItemDesc::Class { decls } => SignatureItemDesc::Class {
                decls: decls.try_map(|d| mapper.map_class_description(d))?,
            },
            SignatureItemDesc::ClassType { decls } => SignatureItemDesc::ClassType {
                decls: decls.try_map(|d| mapper.map_class_description(d))?,
            },
            SignatureItemDesc::Attribute { attribute } => SignatureItemDesc::Attribute {
                attribute: mapper.map_attribute(attribute)?,
            },
            SignatureItemDesc::Extension { extension } => SignatureItemDesc::Extension {
                extension: mapper.map_extension(extension)?,
            },
        })
    })
}

fn walk_map_include<M, T>(
    mapper: &mut M,
    include: IncludeInfos<T>,
    f: impl FnOnce(&mut M, T) -> MapResult<T, M>,
) -> MapResult<IncludeInfos<T>, M>
where
    M: Mapper + ?Sized,
{
    Ok(IncludeInfos {
        item: f(mapper, include.item)?,
        loc: mapper.map_location(include.loc)?,
        attributes: mapper.map_attributes(include.attributes)?,
    })
}

pub fn walk_map_module_expr<M: Mapper + ?Sized>(
    mapper: &mut M,
    module: ModuleExpr,
) -> MapResult<ModuleExpr, M> {
    map_node(mapper, module, |mapper, desc| {
        Ok(match desc {
            desc @ ModuleExprDesc::Ident { .. } => desc,
            ModuleExprDesc::Structure { items } => ModuleExprDesc::Structure {
                items: mapper.map_structure(items)?,
            },
            ModuleExprDesc::Functor {
                param,
                param_type,
                body,
            } => ModuleExprDesc::Functor {
                param,
                param_type: param_type
                    .map(|mt| mapper.map_module_type(mt))
                    .transpose()?,
                body: map_boxed(mapper, body, |m, b| m.map_module_expr(b))?,
            },
            ModuleExprDesc::Apply { functor, arg } => ModuleExprDesc::Apply {
                functor: map_boxed(mapper, functor, |m, f| m.map_module_expr(f))?,
                arg: map_boxed(mapper, arg, |m, a| m.map_module_expr(a))?,
            },
            ModuleExprDesc::Constraint {
                module,
                module_type,
            } => ModuleExprDesc::Constraint {
                module: map_boxed(mapper, module, |m, me| m.map_module_expr(me))?,
                module_type: mapper.map_module_type(module_type)?,
            },
            ModuleExprDesc::Unpack { expr } => ModuleExprDesc::Unpack {
                expr: map_boxed(mapper, expr, |m, e| m.map_expression(e))?,
            },
            ModuleExprDesc::Extension { extension } => ModuleExprDesc::Extension {
                extension: mapper.map_extension(extension)?,
            },
        })
    })
}

pub fn walk_map_module_type<M: Mapper + ?Sized>(
    mapper: &mut M,
    module_type: ModuleType,
) -> MapResult<ModuleType, M> {
    map_node(mapper, module_type, |mapper, desc| {
        Ok(match desc {
            desc @ ModuleTypeDesc::Ident { .. } => desc,
            ModuleTypeDesc::Signature { items } => ModuleTypeDesc::Signature {
                items: mapper.map_signature(items)?,
            },
            ModuleTypeDesc::Functor {
                param,
                param_type,
                body,
            } => ModuleTypeDesc::Functor {
                param,
                param_type: param_type
                    .map(|mt| map_boxed(mapper, mt, |m, t| m.map_module_type(t)))
                    .transpose()?,
                body: map_boxed(mapper, body, |m, t| m.map_module_type(t))?,
            },
            ModuleTypeDesc::With {
                module_type,
                constraints,
            } => ModuleTypeDesc::With {
                module_type: map_boxed(mapper, module_type, |m, t| m.map_module_type(t))?,
                constraints: constraints
                    .into_iter()
                    .map(|c| mapper.map_with_constraint(c))
                    .collect::<Result<_, _>>()?,
            },
            ModuleTypeDesc::TypeOf { module } => ModuleTypeDesc::TypeOf {
                module: map_boxed(mapper, module, |m, me| m.map_module_expr(me))?,
            },
            ModuleTypeDesc::Extension { extension } => ModuleTypeDesc::Extension {
                extension: mapper.map_extension(extension)?,
            },
        })
    })
}

pub fn walk_map_with_constraint<M: Mapper + ?Sized>(
    mapper: &mut M,
    constraint: WithConstraint,
) -> MapResult<WithConstraint, M> {
    Ok(match constraint {
        WithConstraint::Type { lid, decl } => WithConstraint::Type {
            lid,
            decl: mapper.map_type_declaration(decl)?,
        },
        WithConstraint::TypeSubst { decl } => WithConstraint::TypeSubst {
            decl: mapper.map_type_declaration(decl)?,
        },
        other @ (WithConstraint::Module { .. } | WithConstraint::ModuleSubst { .. }) => other,
    })
}

// =============================================================================
// Declarations
// =============================================================================

pub fn walk_map_type_declaration<M: Mapper + ?Sized>(
    mapper: &mut M,
    decl: TypeDeclaration,
) -> MapResult<TypeDeclaration, M> {
    let constraints = decl
        .constraints
        .into_iter()
        .map(|c| -> MapResult<_, M> {
            Ok(TypeParamConstraint {
                lhs: mapper.map_core_type(c.lhs)?,
                rhs: mapper.map_core_type(c.rhs)?,
                loc: mapper.map_location(c.loc)?,
            })
        })
        .collect::<MapResult<_, M>>()?;
    let kind = match decl.kind {
        TypeKind::Abstract => TypeKind::Abstract,
        TypeKind::Variant { constructors } => TypeKind::Variant {
            constructors: constructors
                .into_iter()
                .map(|c| mapper.map_constructor_declaration(c))
                .collect::<Result<_, _>>()?,
        },
        TypeKind::Record { labels } => TypeKind::Record {
            labels: labels
                .into_iter()
                .map(|l| mapper.map_label_declaration(l))
                .collect::<Result<_, _>>()?,
        },
    };
    Ok(TypeDeclaration {
        name: decl.name,
        params: decl.params,
        constraints,
        kind,
        private: decl.private,
        manifest: decl.manifest.map(|ty| mapper.map_core_type(ty)).transpose()?,
        loc: mapper.map_location(decl.loc)?,
        attributes: mapper.map_attributes(decl.attributes)?,
    })
}

// =============================================================================
// Classes
// =============================================================================

fn walk_map_class_infos<M, T>(
    mapper: &mut M,
    infos: ClassInfos<T>,
    f: impl FnOnce(&mut M, T) -> MapResult<T, M>,
) -> MapResult<ClassInfos<T>, M>
where
    M: Mapper + ?Sized,
{
    Ok(ClassInfos {
        virtual_flag: infos.virtual_flag,
        params: infos.params,
        name: infos.name,
        expr: f(mapper, infos.expr)?,
        loc: mapper.map_location(infos.loc)?,
        attributes: mapper.map_attributes(infos.attributes)?,
    })
}

pub fn walk_map_class_expr<M: Mapper + ?Sized>(
    mapper: &mut M,
    class_expr: ClassExpr,
) -> MapResult<ClassExpr, M> {
    map_node(mapper, class_expr, |mapper, desc| {
        Ok(match desc {
            ClassExprDesc::Constr { lid, args } => ClassExprDesc::Constr {
                lid,
                args: map_types(mapper, args)?,
            },
            ClassExprDesc::Structure { structure } => ClassExprDesc::Structure {
                structure: mapper.map_class_structure(structure)?,
            },
            ClassExprDesc::Fun {
                label,
                default,
                pattern,
                body,
            } => ClassExprDesc::Fun {
                label,
                default: default.map(|d| mapper.map_expression(d)).transpose()?,
                pattern: mapper.map_pattern(pattern)?,
                body: map_boxed(mapper, body, |m, b| m.map_class_expr(b))?,
            },
            ClassExprDesc::Apply { class_expr, args } => ClassExprDesc::Apply {
                class_expr: map_boxed(mapper, class_expr, |m, c| m.map_class_expr(c))?,
                args: args.try_map(|(label, arg)| {
                    mapper.map_expression(arg).map(|arg| (label, arg))
                })?,
            },
            ClassExprDesc::Let {
                rec_flag,
                bindings,
                body,
            } => ClassExprDesc::Let {
                rec_flag,
                bindings: bindings.try_map(|b| mapper.map_value_binding(b))?,
                body: map_boxed(mapper, body, |m, b| m.map_class_expr(b))?,
            },
            ClassExprDesc::Constraint {
                class_expr,
                class_type,
            } => ClassExprDesc::Constraint {
                class_expr: map_boxed(mapper, class_expr, |m, c| m.map_class_expr(c))?,
                class_type: mapper.map_class_type(class_type)?,
            },
            ClassExprDesc::Extension { extension } => ClassExprDesc::Extension {
                extension: mapper.map_extension(extension)?,
            },
        })
    })
}

fn walk_map_class_field_kind<M: Mapper + ?Sized>(
    mapper: &mut M,
    kind: ClassFieldKind,
) -> MapResult<ClassFieldKind, M> {
    Ok(match kind {
        ClassFieldKind::Virtual { ty } => ClassFieldKind::Virtual {
            ty: mapper.map_core_type(ty)?,
        },
        ClassFieldKind::Concrete {
            override_flag,
            expr,
        } => ClassFieldKind::Concrete {
            override_flag,
            expr: mapper.map_expression(expr)?,
        },
    })
}

pub fn walk_map_class_field<M: Mapper + ?Sized>(
    mapper: &mut M,
    field: ClassField,
) -> MapResult<ClassField, M> {
    map_node(mapper, field, |mapper, desc| {
        Ok(match desc {
            ClassFieldDesc::Inherit {
                override_flag,
                class_expr,
                alias,
            } => ClassFieldDesc::Inherit {
                override_flag,
                class_expr: mapper.map_class_expr(class_expr)?,
                alias,
            },
            ClassFieldDesc::Val {
                name,
                mutable,
                member,
            } => ClassFieldDesc::Val {
                name,
                mutable,
                member: walk_map_class_field_kind(mapper, member)?,
            },
            ClassFieldDesc::Method {
                name,
                private,
                member,
            } => ClassFieldDesc::Method {
                name,
                private,
                member: walk_map_class_field_kind(mapper, member)?,
            },
            ClassFieldDesc::Constraint { lhs, rhs } => ClassFieldDesc::Constraint {
                lhs: mapper.map_core_type(lhs)?,
                rhs: mapper.map_core_type(rhs)?,
            },
            ClassFieldDesc::Initializer { expr } => ClassFieldDesc::Initializer {
                expr: mapper.map_expression(expr)?,
            },
            ClassFieldDesc::Attribute { attribute } => ClassFieldDesc::Attribute {
                attribute: mapper.map_attribute(attribute)?,
            },
            ClassFieldDesc::Extension { extension } => ClassFieldDesc::Extension {
                extension: mapper.map_extension(extension)?,
            },
        })
    })
}

pub fn walk_map_class_type<M: Mapper + ?Sized>(
    mapper: &mut M,
    class_type: ClassType,
) -> MapResult<ClassType, M> {
    map_node(mapper, class_type, |mapper, desc| {
        Ok(match desc {
            ClassTypeDesc::Constr { lid, args } => ClassTypeDesc::Constr {
                lid,
                args: map_types(mapper, args)?,
            },
            ClassTypeDesc::Signature { signature } => ClassTypeDesc::Signature {
                signature: mapper.map_class_signature(signature)?,
            },
            ClassTypeDesc::Arrow { label, arg, ret } => ClassTypeDesc::Arrow {
                label,
                arg: mapper.map_core_type(arg)?,
                ret: map_boxed(mapper, ret, |m, r| m.map_class_type(r))?,
            },
            ClassTypeDesc::Extension { extension } => ClassTypeDesc::Extension {
                extension: mapper.map_extension(extension)?,
            },
        })
    })
}

pub fn walk_map_class_type_field<M: Mapper + ?Sized>(
    mapper: &mut M,
    field: ClassTypeField,
) -> MapResult<ClassTypeField, M> {
    map_node(mapper, field, |mapper, desc| {
        Ok(match desc {
            ClassTypeFieldDesc::Inherit { class_type } => ClassTypeFieldDesc::Inherit {
                class_type: mapper.map_class_type(class_type)?,
            },
            ClassTypeFieldDesc::Val {
                name,
                mutable,
                virtual_flag,
                ty,
            } => ClassTypeFieldDesc::Val {
                name,
                mutable,
                virtual_flag,
                ty: mapper.map_core_type(ty)?,
            },
            ClassTypeFieldDesc::Method {
                name,
                private,
                virtual_flag,
                ty,
            } => ClassTypeFieldDesc::Method {
                name,
                private,
                virtual_flag,
                ty: mapper.map_core_type(ty)?,
            },
            ClassTypeFieldDesc::Constraint { lhs, rhs } => ClassTypeFieldDesc::Constraint {
                lhs: mapper.map_core_type(lhs)?,
                rhs: mapper.map_core_type(rhs)?,
            },
            ClassTypeFieldDesc::Attribute { attribute } => ClassTypeFieldDesc::Attribute {
                attribute: mapper.map_attribute(attribute)?,
            },
            ClassTypeFieldDesc::Extension { extension } => ClassTypeFieldDesc::Extension {
                extension: mapper.map_extension(extension)?,
            },
        })
    })
}

// =============================================================================
// Values
// =============================================================================

fn walk_map_type_constraint<M: Mapper + ?Sized>(
    mapper: &mut M,
    constraint: TypeConstraint,
) -> MapResult<TypeConstraint, M> {
    Ok(match constraint {
        TypeConstraint::Annotation { ty } => TypeConstraint::Annotation {
            ty: mapper.map_core_type(ty)?,
        },
        TypeConstraint::Coercion { target } => TypeConstraint::Coercion {
            target: mapper.map_core_type(target)?,
        },
        TypeConstraint::AnnotatedCoercion { source, target } => {
            TypeConstraint::AnnotatedCoercion {
                source: mapper.map_core_type(source)?,
                target: mapper.map_core_type(target)?,
            }
        }
    })
}

pub fn walk_map_expression<M: Mapper + ?Sized>(
    mapper: &mut M,
    expr: Expression,
) -> MapResult<Expression, M> {
    map_node(mapper, expr, |mapper, desc| {
        let boxed = |m: &mut M, e: Box<Expression>| map_boxed(m, e, |m, e| m.map_expression(e));
        Ok(match desc {
            desc @ (ExpressionDesc::Ident { .. }
            | ExpressionDesc::Constant { .. }
            | ExpressionDesc::New { .. }
            | ExpressionDesc::AssertFalse) => desc,
            ExpressionDesc::Let {
                rec_flag,
                bindings,
                body,
            } => ExpressionDesc::Let {
                rec_flag,
                bindings: bindings.try_map(|b| mapper.map_value_binding(b))?,
                body: boxed(mapper, body)?,
            },
            ExpressionDesc::Function {
                label,
                default,
                cases,
            } => ExpressionDesc::Function {
                label,
                default: default.map(|d| boxed(mapper, d)).transpose()?,
                cases: cases.try_map(|c| mapper.map_case(c))?,
            },
            ExpressionDesc::Apply { callee, args } => ExpressionDesc::Apply {
                callee: boxed(mapper, callee)?,
                args: args.try_map(|(label, arg)| {
                    mapper.map_expression(arg).map(|arg| (label, arg))
                })?,
            },
            ExpressionDesc::Match { scrutinee, cases } => ExpressionDesc::Match {
                scrutinee: boxed(mapper, scrutinee)?,
                cases: cases.try_map(|c| mapper.map_case(c))?,
            },
            ExpressionDesc::Try { body, cases } => ExpressionDesc::Try {
                body: boxed(mapper, body)?,
                cases: cases.try_map(|c| mapper.map_case(c))?,
            },
            ExpressionDesc::Tuple { elements } => ExpressionDesc::Tuple {
                elements: elements.try_map(|e| mapper.map_expression(e))?,
            },
            ExpressionDesc::Construct {
                lid,
                arg,
                explicit_arity,
            } => ExpressionDesc::Construct {
                lid,
                arg: arg.map(|a| boxed(mapper, a)).transpose()?,
                explicit_arity,
            },
            ExpressionDesc::Variant { label, arg } => ExpressionDesc::Variant {
                label,
                arg: arg.map(|a| boxed(mapper, a)).transpose()?,
            },
            ExpressionDesc::Record { fields, base } => ExpressionDesc::Record {
                fields: fields
                    .into_iter()
                    .map(|(lid, value)| mapper.map_expression(value).map(|value| (lid, value)))
                    .collect::<Result<_, _>>()?,
                base: base.map(|b| boxed(mapper, b)).transpose()?,
            },
            ExpressionDesc::Field { record, lid } => ExpressionDesc::Field {
                record: boxed(mapper, record)?,
                lid,
            },
            ExpressionDesc::SetField { record, lid, value } => ExpressionDesc::SetField {
                record: boxed(mapper, record)?,
                lid,
                value: boxed(mapper, value)?,
            },
            ExpressionDesc::Array { elements } => ExpressionDesc::Array {
                elements: map_exprs(mapper, elements)?,
            },
            ExpressionDesc::IfThenElse {
                cond,
                then_branch,
                else_branch,
            } => ExpressionDesc::IfThenElse {
                cond: boxed(mapper, cond)?,
                then_branch: boxed(mapper, then_branch)?,
                else_branch: else_branch.map(|e| boxed(mapper, e)).transpose()?,
            },
            ExpressionDesc::Sequence { first, second } => ExpressionDesc::Sequence {
                first: boxed(mapper, first)?,
                second: boxed(mapper, second)?,
            },
            ExpressionDesc::While { cond, body } => ExpressionDesc::While {
                cond: boxed(mapper, cond)?,
                body: boxed(mapper, body)?,
            },
            ExpressionDesc::For {
                var,
                start,
                stop,
                direction,
                body,
            } => ExpressionDesc::For {
                var,
                start: boxed(mapper, start)?,
                stop: boxed(mapper, stop)?,
                direction,
                body: boxed(mapper, body)?,
            },
            ExpressionDesc::Constraint {
                expr: inner,
                constraint,
            } => ExpressionDesc::Constraint {
                expr: boxed(mapper, inner)?,
                constraint: walk_map_type_constraint(mapper, constraint)?,
            },
            ExpressionDesc::Send { object, method } => ExpressionDesc::Send {
                object: boxed(mapper, object)?,
                method,
            },
            ExpressionDesc::SetInstVar { name, value } => ExpressionDesc::SetInstVar {
                name,
                value: boxed(mapper, value)?,
            },
            ExpressionDesc::Override { fields } => ExpressionDesc::Override {
                fields: fields
                    .into_iter()
                    .map(|(name, value)| mapper.map_expression(value).map(|value| (name, value)))
                    .collect::<Result<_, _>>()?,
            },
            ExpressionDesc::LetModule { name, module, body } => ExpressionDesc::LetModule {
                name,
                module: mapper.map_module_expr(module)?,
                body: boxed(mapper, body)?,
            },
            ExpressionDesc::Assert { cond } => ExpressionDesc::Assert {
                cond: boxed(mapper, cond)?,
            },
            ExpressionDesc::Lazy { expr: inner } => ExpressionDesc::Lazy {
                expr: boxed(mapper, inner)?,
            },
            ExpressionDesc::Poly { expr: inner, ty } => ExpressionDesc::Poly {
                expr: boxed(mapper, inner)?,
                ty: ty.map(|ty| mapper.map_core_type(ty)).transpose()?,
            },
            ExpressionDesc::Object { structure } => ExpressionDesc::Object {
                structure: mapper.map_class_structure(structure)?,
            },
            ExpressionDesc::NewType { name, body } => ExpressionDesc::NewType {
                name,
                body: boxed(mapper, body)?,
            },
            ExpressionDesc::Pack { module } => ExpressionDesc::Pack {
                module: mapper.map_module_expr(module)?,
            },
            ExpressionDesc::Open {
                override_flag,
                lid,
                body,
            } => ExpressionDesc::Open {
                override_flag,
                lid,
                body: boxed(mapper, body)?,
            },
            ExpressionDesc::Extension { extension } => ExpressionDesc::Extension {
                extension: mapper.map_extension(extension)?,
            },
        })
    })
}

pub fn walk_map_pattern<M: Mapper + ?Sized>(
    mapper: &mut M,
    pattern: Pattern,
) -> MapResult<Pattern, M> {
    map_node(mapper, pattern, |mapper, desc| {
        let pat = |m: &mut M, p: Box<Pattern>| map_boxed(m, p, |m, p| m.map_pattern(p));
        Ok(match desc {
            desc @ (PatternDesc::Any
            | PatternDesc::Var { .. }
            | PatternDesc::Constant { .. }
            | PatternDesc::Type { .. }
            | PatternDesc::Unpack { .. }) => desc,
            PatternDesc::Alias { pattern, name } => PatternDesc::Alias {
                pattern: pat(mapper, pattern)?,
                name,
            },
            PatternDesc::Tuple { elements } => PatternDesc::Tuple {
                elements: elements.try_map(|p| mapper.map_pattern(p))?,
            },
            PatternDesc::Construct {
                lid,
                arg,
                explicit_arity,
            } => PatternDesc::Construct {
                lid,
                arg: arg.map(|a| pat(mapper, a)).transpose()?,
                explicit_arity,
            },
            PatternDesc::Variant { label, arg } => PatternDesc::Variant {
                label,
                arg: arg.map(|a| pat(mapper, a)).transpose()?,
            },
            PatternDesc::Record { fields, closed } => PatternDesc::Record {
                fields: fields
                    .into_iter()
                    .map(|(lid, p)| mapper.map_pattern(p).map(|p| (lid, p)))
                    .collect::<Result<_, _>>()?,
                closed,
            },
            PatternDesc::Array { elements } => PatternDesc::Array {
                elements: map_patterns(mapper, elements)?,
            },
            PatternDesc::Or { left, right } => PatternDesc::Or {
                left: pat(mapper, left)?,
                right: pat(mapper, right)?,
            },
            PatternDesc::Constraint { pattern, ty } => PatternDesc::Constraint {
                pattern: pat(mapper, pattern)?,
                ty: mapper.map_core_type(ty)?,
            },
            PatternDesc::Lazy { pattern } => PatternDesc::Lazy {
                pattern: pat(mapper, pattern)?,
            },
            PatternDesc::Extension { extension } => PatternDesc::Extension {
                extension: mapper.map_extension(extension)?,
            },
        })
    })
}

pub fn walk_map_core_type<M: Mapper + ?Sized>(
    mapper: &mut M,
    ty: CoreType,
) -> MapResult<CoreType, M> {
    map_node(mapper, ty, |mapper, desc| {
        let boxed = |m: &mut M, t: Box<CoreType>| map_boxed(m, t, |m, t| m.map_core_type(t));
        Ok(match desc {
            desc @ (CoreTypeDesc::Any | CoreTypeDesc::Var { .. }) => desc,
            CoreTypeDesc::Arrow { label, arg, ret } => CoreTypeDesc::Arrow {
                label,
                arg: boxed(mapper, arg)?,
                ret: boxed(mapper, ret)?,
            },
            CoreTypeDesc::Tuple { elements } => CoreTypeDesc::Tuple {
                elements: elements.try_map(|t| mapper.map_core_type(t))?,
            },
            CoreTypeDesc::Constr { lid, args } => CoreTypeDesc::Constr {
                lid,
                args: map_types(mapper, args)?,
            },
            CoreTypeDesc::Object { fields, closed } => CoreTypeDesc::Object {
                fields: fields
                    .into_iter()
                    .map(|f| {
                        mapper
                            .map_core_type(f.ty)
                            .map(|ty| ObjectField { name: f.name, ty })
                    })
                    .collect::<Result<_, _>>()?,
                closed,
            },
            CoreTypeDesc::Class { lid, args, labels } => CoreTypeDesc::Class {
                lid,
                args: map_types(mapper, args)?,
                labels,
            },
            CoreTypeDesc::Alias { ty, name } => CoreTypeDesc::Alias {
                ty: boxed(mapper, ty)?,
                name,
            },
            CoreTypeDesc::Variant {
                fields,
                closed,
                present,
            } => CoreTypeDesc::Variant {
                fields: fields
                    .into_iter()
                    .map(|field| match field {
                        RowField::Tag {
                            label,
                            is_const,
                            types,
                        } => map_types(mapper, types).map(|types| RowField::Tag {
                            label,
                            is_const,
                            types,
                        }),
                        RowField::Inherit { ty } => mapper
                            .map_core_type(ty)
                            .map(|ty| RowField::Inherit { ty }),
                    })
                    .collect::<Result<_, _>>()?,
                closed,
                present,
            },
            CoreTypeDesc::Poly { vars, ty } => CoreTypeDesc::Poly {
                vars,
                ty: boxed(mapper, ty)?,
            },
            CoreTypeDesc::Package { package } => CoreTypeDesc::Package {
                package: PackageType {
                    lid: package.lid,
                    constraints: package
                        .constraints
                        .into_iter()
                        .map(|(lid, ty)| mapper.map_core_type(ty).map(|ty| (lid, ty)))
                        .collect::<Result<_, _>>()?,
                },
            },
            CoreTypeDesc::Extension { extension } => CoreTypeDesc::Extension {
                extension: mapper.map_extension(extension)?,
            },
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asttypes::Constant;
    use crate::location::{FileId, Position};
    use std::convert::Infallible;

    /// Marks every span as synthesised.
    struct Ghostify;

    impl Mapper for Ghostify {
        type Error = Infallible;

        fn map_location(&mut self, loc: Location) -> Result<Location, Infallible> {
            Ok(loc.to_ghost())
        }
    }

    /// Replaces integer constants by their double, refusing negatives.
    struct Double;

    impl Mapper for Double {
        type Error = String;

        fn map_expression(&mut self, expr: Expression) -> Result<Expression, String> {
            match expr.desc {
                ExpressionDesc::Constant {
                    constant: Constant::Int(n),
                } if n < 0 => Err(format!("negative constant {n}")),
                ExpressionDesc::Constant {
                    constant: Constant::Int(n),
                } => Ok(Expression::constant(expr.loc, Constant::Int(n * 2))
                    .with_attributes(expr.attributes)),
                _ => walk_map_expression(self, expr),
            }
        }
    }

    fn loc() -> Location {
        Location::new(FileId(0), Position::new(1, 1, 0), Position::new(1, 5, 4))
    }

    fn int(n: i64) -> Expression {
        Expression::constant(loc(), Constant::Int(n))
    }

    fn ints(e: &Expression) -> Vec<i64> {
        match &e.desc {
            ExpressionDesc::Tuple { elements } => elements
                .iter()
                .map(|e| match e.desc {
                    ExpressionDesc::Constant {
                        constant: Constant::Int(n),
                    } => n,
                    _ => panic!("Expected Int"),
                })
                .collect(),
            _ => panic!("Expected Tuple"),
        }
    }

    #[test]
    fn test_map_location_reaches_nested_nodes() {
        let e = Expression::tuple(loc(), vec![int(1), int(2)]).unwrap();
        let mapped = Ghostify.map_expression(e).unwrap();
        assert!(mapped.loc.ghost);
        match &mapped.desc {
            ExpressionDesc::Tuple { elements } => assert!(elements.iter().all(|e| e.loc.ghost)),
            _ => panic!("Expected Tuple"),
        }
    }

    #[test]
    fn test_rewrite_keeps_shape() {
        let e = Expression::tuple(loc(), vec![int(1), int(2), int(3)]).unwrap();
        let mapped = Double.map_expression(e).unwrap();
        assert_eq!(ints(&mapped), vec![2, 4, 6]);
    }

    #[test]
    fn test_rewrite_error_propagates() {
        let e = Expression::tuple(loc(), vec![int(1), int(-1)]).unwrap();
        assert_eq!(
            Double.map_expression(e).unwrap_err(),
            "negative constant -1"
        );
    }
}
