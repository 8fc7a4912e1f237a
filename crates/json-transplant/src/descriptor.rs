//! Type descriptor resolution.
//!
//! A [`TypeDescriptor`] is the validated, resolved form of a container's
//! [`Shape`]: the root field, the sibling fields keyed by the configured
//! comparer, and the optional construction recipe with every parameter bound
//! to the field it is filled from.

use std::fmt;

use tracing::debug;

use crate::comparer::{default_comparer, ComparerKind, SharedComparer};
use crate::error::TransplantError;
use crate::ordered_map::OrderedMap;
use crate::shape::{ConstructionArgs, ConstructorDef, DefaultFn, FieldDef, ParamDef, Shape, Transplant};

// ── Recipe ────────────────────────────────────────────────────────────────

/// Where a constructor parameter takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamBinding {
    Root,
    /// Index into the descriptor's sibling fields.
    Sibling(usize),
    /// No field matches; the slot stays empty.
    Unbound,
}

/// The designated constructor together with its resolved parameter bindings.
pub struct Recipe<T> {
    constructor: ConstructorDef<T>,
    bindings: Vec<ParamBinding>,
    root_slot: usize,
    sibling_slots: Vec<Option<usize>>,
}

impl<T> Recipe<T> {
    pub fn params(&self) -> &[ParamDef] {
        self.constructor.params()
    }

    pub fn bindings(&self) -> &[ParamBinding] {
        &self.bindings
    }

    /// Argument slot the root value goes into.
    pub fn root_slot(&self) -> usize {
        self.root_slot
    }

    /// Argument slot for the sibling at `sibling_index`, if any parameter takes it.
    pub fn sibling_slot(&self, sibling_index: usize) -> Option<usize> {
        self.sibling_slots.get(sibling_index).copied().flatten()
    }

    pub fn new_args(&self) -> ConstructionArgs {
        ConstructionArgs::new(self.params())
    }

    pub fn invoke(&self, args: ConstructionArgs) -> Result<T, TransplantError> {
        self.constructor.invoke(args)
    }
}

impl<T> fmt::Debug for Recipe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("params", &self.params())
            .field("bindings", &self.bindings)
            .finish()
    }
}

// ── TypeDescriptor ────────────────────────────────────────────────────────

pub struct TypeDescriptor<T> {
    type_name: &'static str,
    fields: Vec<FieldDef<T>>,
    root_index: usize,
    siblings: OrderedMap<FieldDef<T>>,
    recipe: Option<Recipe<T>>,
    default: Option<DefaultFn<T>>,
    comparer: SharedComparer,
}

impl<T> TypeDescriptor<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn root(&self) -> &FieldDef<T> {
        &self.fields[self.root_index]
    }

    /// All declared fields, root included, in declaration order.
    pub fn fields(&self) -> &[FieldDef<T>] {
        &self.fields
    }

    /// Non-root fields in declaration order, looked up through the comparer.
    pub fn siblings(&self) -> &OrderedMap<FieldDef<T>> {
        &self.siblings
    }

    pub fn recipe(&self) -> Option<&Recipe<T>> {
        self.recipe.as_ref()
    }

    pub fn comparer(&self) -> &SharedComparer {
        &self.comparer
    }

    pub fn is_sibling_name(&self, name: &str) -> bool {
        self.siblings.contains_key(name)
    }

    pub fn is_root_name(&self, name: &str) -> bool {
        self.comparer.equals(self.root().name(), name)
    }

    /// Builds an instance for the assignment path.
    pub(crate) fn new_default(&self) -> Result<T, TransplantError> {
        self.default
            .as_ref()
            .map(|factory| factory())
            .ok_or(TransplantError::NotConstructible {
                type_name: self.type_name,
            })
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("root", self.root())
            .field("siblings", &self.siblings.keys().collect::<Vec<_>>())
            .field("recipe", &self.recipe)
            .field("comparer", &self.comparer)
            .finish()
    }
}

// ── Factory ───────────────────────────────────────────────────────────────

/// Resolves container types into descriptors.
pub trait DescriptorFactory: Send + Sync {
    fn can_convert<T: Transplant>(&self) -> bool;

    fn build_descriptor<T: Transplant>(&self) -> Result<TypeDescriptor<T>, TransplantError>;
}

/// The default factory: resolves a type from its declared [`Shape`].
#[derive(Debug, Clone)]
pub struct ShapeDescriptorFactory {
    comparer: SharedComparer,
}

impl ShapeDescriptorFactory {
    pub fn new(comparer: SharedComparer) -> Self {
        Self { comparer }
    }

    /// Selects a built-in comparer by name, e.g. `"Ordinal"`.
    pub fn from_comparer_name(name: &str) -> Result<Self, TransplantError> {
        Ok(Self::new(name.parse::<ComparerKind>()?.comparer()))
    }

    pub fn comparer(&self) -> &SharedComparer {
        &self.comparer
    }

    pub fn resolve<T>(&self, shape: Shape<T>) -> Result<TypeDescriptor<T>, TransplantError> {
        let type_name = shape.type_name;
        if !shape.container {
            return Err(TransplantError::NotContainer { type_name });
        }

        let mut roots = shape.fields.iter().enumerate().filter(|(_, f)| f.is_root());
        let root_index = match (roots.next(), roots.next()) {
            (Some((index, _)), None) => index,
            (None, _) => return Err(TransplantError::MissingRoot { type_name }),
            (Some(_), Some(_)) => return Err(TransplantError::MultipleRoots { type_name }),
        };

        let mut designated = shape.constructors.into_iter().filter(|c| c.is_designated());
        let constructor = match (designated.next(), designated.next()) {
            (_, Some(_)) => return Err(TransplantError::MultipleRecipes { type_name }),
            (constructor, None) => constructor,
        };

        // Root and siblings share one namespace.
        OrderedMap::from_entries(
            self.comparer.clone(),
            shape.fields.iter().map(|f| (f.name(), ())),
        )
        .map_err(|source| TransplantError::DuplicateField { type_name, source })?;

        let siblings = OrderedMap::from_entries(
            self.comparer.clone(),
            shape
                .fields
                .iter()
                .filter(|f| !f.is_root())
                .map(|f| (f.name(), f.clone())),
        )
        .map_err(|source| TransplantError::DuplicateField { type_name, source })?;

        let root = &shape.fields[root_index];
        let recipe = constructor
            .map(|c| self.bind_recipe(type_name, c, root, &siblings))
            .transpose()?;

        debug!(
            container = type_name,
            root = root.name(),
            siblings = siblings.len(),
            recipe = recipe.is_some(),
            "resolved transplant descriptor"
        );

        Ok(TypeDescriptor {
            type_name,
            fields: shape.fields,
            root_index,
            siblings,
            recipe,
            default: shape.default,
            comparer: self.comparer.clone(),
        })
    }

    fn bind_recipe<T>(
        &self,
        type_name: &'static str,
        constructor: ConstructorDef<T>,
        root: &FieldDef<T>,
        siblings: &OrderedMap<FieldDef<T>>,
    ) -> Result<Recipe<T>, TransplantError> {
        OrderedMap::from_entries(
            self.comparer.clone(),
            constructor.params().iter().map(|p| (p.name, ())),
        )
        .map_err(|source| TransplantError::DuplicateField { type_name, source })?;

        let mut bindings = Vec::with_capacity(constructor.params().len());
        let mut sibling_slots = vec![None; siblings.len()];
        let mut root_slot = None;

        for (slot, param) in constructor.params().iter().enumerate() {
            let bound = if self.comparer.equals(param.name, root.name()) {
                root_slot = Some(slot);
                Some((ParamBinding::Root, root))
            } else {
                siblings.get_full(param.name).map(|(index, _, field)| {
                    sibling_slots[index] = Some(slot);
                    (ParamBinding::Sibling(index), field)
                })
            };
            match bound {
                Some((binding, field)) => {
                    if field.type_id() != param.type_id {
                        return Err(TransplantError::ParameterTypeMismatch {
                            type_name,
                            param: param.name,
                            expected: param.type_name,
                            found: field.type_name(),
                        });
                    }
                    bindings.push(binding);
                }
                None => bindings.push(ParamBinding::Unbound),
            }
        }

        let root_slot = root_slot.ok_or(TransplantError::UnboundRootParameter {
            type_name,
            root: root.name(),
        })?;

        Ok(Recipe {
            constructor,
            bindings,
            root_slot,
            sibling_slots,
        })
    }
}

impl Default for ShapeDescriptorFactory {
    fn default() -> Self {
        Self::new(default_comparer())
    }
}

impl DescriptorFactory for ShapeDescriptorFactory {
    fn can_convert<T: Transplant>(&self) -> bool {
        T::shape().is_container()
    }

    fn build_descriptor<T: Transplant>(&self) -> Result<TypeDescriptor<T>, TransplantError> {
        self.resolve(T::shape())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::Ordinal;
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct Holder {
        main: Option<i32>,
        extra: Option<String>,
        more: u8,
    }

    fn main_field() -> FieldDef<Holder> {
        FieldDef::new("Main", |h: &Holder| &h.main, |h: &mut Holder, v| h.main = v)
    }

    fn extra_field() -> FieldDef<Holder> {
        FieldDef::new("Extra", |h: &Holder| &h.extra, |h: &mut Holder, v| h.extra = v)
    }

    fn more_field() -> FieldDef<Holder> {
        FieldDef::new("More", |h: &Holder| &h.more, |h: &mut Holder, v| h.more = v)
    }

    fn shape() -> Shape<Holder> {
        Shape::container("Holder")
            .field(extra_field())
            .field(main_field().root())
            .field(more_field())
            .with_default()
    }

    fn holder_ctor() -> ConstructorDef<Holder> {
        ConstructorDef::new(|mut args: ConstructionArgs| {
            Ok(Holder {
                main: args.take_or_default(0)?,
                extra: args.take_or_default(1)?,
                more: 0,
            })
        })
        .param::<Option<i32>>("main")
        .param::<Option<String>>("EXTRA")
        .param::<bool>("unrelated")
    }

    #[test]
    fn resolves_root_and_siblings_in_declaration_order() {
        let td = ShapeDescriptorFactory::default().resolve(shape()).unwrap();
        assert_eq!(td.type_name(), "Holder");
        assert_eq!(td.root().name(), "Main");
        assert_eq!(td.siblings().keys().collect::<Vec<_>>(), vec!["Extra", "More"]);
        assert_eq!(td.fields().len(), 3);
        assert!(td.is_sibling_name("extra"));
        assert!(td.is_root_name("MAIN"));
        assert!(td.recipe().is_none());
    }

    #[test]
    fn rejects_non_container() {
        let err = ShapeDescriptorFactory::default()
            .resolve(Shape::<Holder>::plain("Holder").field(main_field().root()))
            .unwrap_err();
        assert!(matches!(err, TransplantError::NotContainer { type_name: "Holder" }));
    }

    #[test]
    fn root_cardinality_is_enforced() {
        let factory = ShapeDescriptorFactory::default();
        let none = factory
            .resolve(Shape::<Holder>::container("Holder").field(main_field()))
            .unwrap_err();
        assert!(matches!(none, TransplantError::MissingRoot { .. }));
        assert!(none.to_string().contains("Holder"));

        let two = factory
            .resolve(
                Shape::<Holder>::container("Holder")
                    .field(main_field().root())
                    .field(extra_field().root()),
            )
            .unwrap_err();
        assert!(matches!(two, TransplantError::MultipleRoots { .. }));
    }

    #[test]
    fn recipe_cardinality_is_enforced() {
        let err = ShapeDescriptorFactory::default()
            .resolve(
                shape()
                    .constructor(holder_ctor().designated())
                    .constructor(holder_ctor().designated()),
            )
            .unwrap_err();
        assert!(matches!(err, TransplantError::MultipleRecipes { .. }));
    }

    #[test]
    fn undesignated_constructors_are_ignored() {
        let td = ShapeDescriptorFactory::default()
            .resolve(shape().constructor(holder_ctor()))
            .unwrap();
        assert!(td.recipe().is_none());
    }

    #[test]
    fn binds_recipe_parameters_through_comparer() {
        let td = ShapeDescriptorFactory::default()
            .resolve(shape().constructor(holder_ctor().designated()))
            .unwrap();
        let recipe = td.recipe().unwrap();
        assert_eq!(
            recipe.bindings(),
            &[ParamBinding::Root, ParamBinding::Sibling(0), ParamBinding::Unbound]
        );
        assert_eq!(recipe.root_slot(), 0);
        assert_eq!(recipe.sibling_slot(0), Some(1));
        assert_eq!(recipe.sibling_slot(1), None);
    }

    #[test]
    fn ordinal_comparer_leaves_case_mismatched_params_unbound() {
        let td = ShapeDescriptorFactory::new(Arc::new(Ordinal))
            .resolve(
                shape().constructor(
                    ConstructorDef::new(|_| Ok(Holder::default()))
                        .param::<Option<i32>>("Main")
                        .param::<Option<String>>("extra")
                        .designated(),
                ),
            )
            .unwrap();
        assert_eq!(
            td.recipe().unwrap().bindings(),
            &[ParamBinding::Root, ParamBinding::Unbound]
        );
    }

    #[test]
    fn recipe_without_root_parameter_is_rejected() {
        let err = ShapeDescriptorFactory::default()
            .resolve(
                shape().constructor(
                    ConstructorDef::new(|_| Ok(Holder::default()))
                        .param::<Option<String>>("extra")
                        .designated(),
                ),
            )
            .unwrap_err();
        assert!(matches!(err, TransplantError::UnboundRootParameter { root: "Main", .. }));
    }

    #[test]
    fn recipe_parameter_type_must_match_field() {
        let err = ShapeDescriptorFactory::default()
            .resolve(
                shape().constructor(
                    ConstructorDef::new(|_| Ok(Holder::default()))
                        .param::<i32>("main")
                        .designated(),
                ),
            )
            .unwrap_err();
        assert!(matches!(err, TransplantError::ParameterTypeMismatch { param: "main", .. }));
    }

    #[test]
    fn duplicate_names_under_comparer_are_rejected() {
        let err = ShapeDescriptorFactory::default()
            .resolve(
                shape().field(FieldDef::new("extra", |h: &Holder| &h.extra, |h: &mut Holder, v| {
                    h.extra = v
                })),
            )
            .unwrap_err();
        assert!(matches!(err, TransplantError::DuplicateField { .. }));

        // Distinct under an ordinal comparer.
        assert!(ShapeDescriptorFactory::new(Arc::new(Ordinal))
            .resolve(
                shape().field(FieldDef::new("extra", |h: &Holder| &h.extra, |h: &mut Holder, v| {
                    h.extra = v
                })),
            )
            .is_ok());
    }

    #[test]
    fn factory_from_comparer_name() {
        let factory = ShapeDescriptorFactory::from_comparer_name("Ordinal").unwrap();
        assert!(!factory.comparer().equals("a", "A"));
        assert!(ShapeDescriptorFactory::from_comparer_name("Bogus").is_err());
    }

    #[test]
    fn missing_default_factory_surfaces_on_use() {
        let td = ShapeDescriptorFactory::default()
            .resolve(Shape::<Holder>::container("Holder").field(main_field().root()))
            .unwrap();
        assert!(matches!(
            td.new_default(),
            Err(TransplantError::NotConstructible { .. })
        ));
    }
}
