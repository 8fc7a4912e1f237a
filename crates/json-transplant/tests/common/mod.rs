//! Shared container fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::OnceLock;

use json_transplant::{
    impl_transplant_serde, ConstructorDef, FieldDef, Shape, Transplant, TransplantConverter,
};
use serde::{Deserialize, Serialize};

// ── Payload types ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Rewt {
    pub root_a: i32,
    pub root_b: i32,
    pub a: i32,
    pub b: i32,
}

impl Rewt {
    pub fn sample() -> Self {
        Self {
            root_a: 100,
            root_b: 200,
            a: 101,
            b: 201,
        }
    }
}

/// A root that also owns a property named like a container sibling.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RewtWithConflictingProperty {
    pub root_a: i32,
    pub root_b: i32,
    pub a: i32,
    pub b: i32,
    pub other1: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Other1 {
    pub a: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Other2 {
    pub b: i32,
    #[serde(skip)]
    pub dont_serialize: String,
    pub nested_container: Option<Box<Container>>,
}

impl Default for Other2 {
    fn default() -> Self {
        Self {
            b: 0,
            dont_serialize: "a value".to_string(),
            nested_container: None,
        }
    }
}

impl Other2 {
    pub fn with_b(b: i32) -> Self {
        Self {
            b,
            ..Self::default()
        }
    }
}

// ── Containers ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Container {
    pub rewt: Option<Rewt>,
    pub other1: Option<Other1>,
    pub other2: Option<Other2>,
}

impl Container {
    pub fn sample() -> Self {
        Self {
            rewt: Some(Rewt::sample()),
            other1: Some(Other1 { a: 1000 }),
            other2: Some(Other2::with_b(2000)),
        }
    }
}

impl Transplant for Container {
    fn shape() -> Shape<Self> {
        Shape::container("Container")
            .field(FieldDef::new("Rewt", |c: &Self| &c.rewt, |c: &mut Self, v| c.rewt = v).root())
            .field(FieldDef::new("Other1", |c: &Self| &c.other1, |c: &mut Self, v| c.other1 = v))
            .field(FieldDef::new("Other2", |c: &Self| &c.other2, |c: &mut Self, v| c.other2 = v))
            .with_default()
    }
}

impl_transplant_serde!(Container);

/// Same fields as [`Container`], read back through the designated constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ImmutableContainer {
    rewt: Rewt,
    other1: Other1,
    other2: Other2,
    pub used_json_constructor: bool,
    pub used_other_constructor: bool,
}

impl ImmutableContainer {
    pub fn new(rewt: Rewt, other1: Other1, other2: Other2) -> Self {
        Self {
            rewt,
            other1,
            other2,
            used_json_constructor: true,
            used_other_constructor: false,
        }
    }

    pub fn from_container(container: Container) -> Self {
        Self {
            used_json_constructor: false,
            used_other_constructor: true,
            ..Self::new(
                container.rewt.unwrap_or_default(),
                container.other1.unwrap_or_default(),
                container.other2.unwrap_or_default(),
            )
        }
    }

    pub fn rewt(&self) -> &Rewt {
        &self.rewt
    }

    pub fn other1(&self) -> &Other1 {
        &self.other1
    }

    pub fn other2(&self) -> &Other2 {
        &self.other2
    }
}

impl Transplant for ImmutableContainer {
    fn shape() -> Shape<Self> {
        Shape::container("ImmutableContainer")
            .field(FieldDef::read_only("Rewt", |c: &Self| &c.rewt).root())
            .field(FieldDef::read_only("Other1", |c: &Self| &c.other1))
            .field(FieldDef::read_only("Other2", |c: &Self| &c.other2))
            .constructor(
                ConstructorDef::new(|_| Ok(Self::from_container(Container::default())))
                    .param::<Container>("container"),
            )
            .constructor(
                ConstructorDef::new(|mut args| {
                    Ok(Self::new(
                        args.take_or_default(0)?,
                        args.take_or_default(1)?,
                        args.take_or_default(2)?,
                    ))
                })
                .param::<Rewt>("rewt")
                .param::<Other1>("other1")
                .param::<Other2>("other2")
                .designated(),
            )
    }
}

impl_transplant_serde!(ImmutableContainer);

pub fn ordinal_converter() -> &'static TransplantConverter {
    static CONVERTER: OnceLock<TransplantConverter> = OnceLock::new();
    CONVERTER.get_or_init(|| {
        TransplantConverter::from_comparer_name("Ordinal").expect("Ordinal is a built-in comparer")
    })
}

/// A [`Container`] lookalike whose names are matched ordinally.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContainerWithConverterCustomization {
    pub rewt: Option<Rewt>,
    pub other1: Option<Other1>,
    pub other2: Option<Other2>,
}

impl Transplant for ContainerWithConverterCustomization {
    fn shape() -> Shape<Self> {
        Shape::container("ContainerWithConverterCustomization")
            .field(FieldDef::new("Rewt", |c: &Self| &c.rewt, |c: &mut Self, v| c.rewt = v).root())
            .field(FieldDef::new("Other1", |c: &Self| &c.other1, |c: &mut Self, v| c.other1 = v))
            .field(FieldDef::new("Other2", |c: &Self| &c.other2, |c: &mut Self, v| c.other2 = v))
            .with_default()
    }
}

impl_transplant_serde!(ContainerWithConverterCustomization, ordinal_converter());

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContainerWithConflictingProperty {
    pub rewt: Option<RewtWithConflictingProperty>,
    pub other1: Option<Other1>,
    pub other2: Option<Other2>,
}

impl Transplant for ContainerWithConflictingProperty {
    fn shape() -> Shape<Self> {
        Shape::container("ContainerWithConflictingProperty")
            .field(FieldDef::new("Rewt", |c: &Self| &c.rewt, |c: &mut Self, v| c.rewt = v).root())
            .field(FieldDef::new("Other1", |c: &Self| &c.other1, |c: &mut Self, v| c.other1 = v))
            .field(FieldDef::new("Other2", |c: &Self| &c.other2, |c: &mut Self, v| c.other2 = v))
            .with_default()
    }
}

impl_transplant_serde!(ContainerWithConflictingProperty);

/// Routes `tracing` output to the test harness when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
