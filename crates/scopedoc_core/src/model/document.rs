//! Scope document domain model.
//!
//! # Responsibility
//! - Hold the authoritative in-memory content of the scope document.
//! - Provide lookup/removal helpers used by the edit session.
//!
//! # Invariants
//! - `id` values are unique within `specific_objectives` and within `criteria`.
//! - Collection order is display order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static OBJECTIVE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^oe(\d+)$").expect("valid objective id regex"));

/// Prefix shared by every specific objective identifier (`oe1`, `oe2`, ...).
pub const OBJECTIVE_ID_PREFIX: &str = "oe";

/// Content given to a freshly added specific objective.
pub const NEW_OBJECTIVE_PLACEHOLDER: &str = "Nuevo objetivo específico...";

/// Acceptance criterion completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    #[default]
    Pending,
    Completed,
}

impl CriterionStatus {
    /// Returns the opposite status.
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }

    /// Badge label shown by the page.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Completed => "Completado",
        }
    }
}

/// One numbered specific objective (`OE1`, `OE2`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecificObjective {
    pub id: String,
    pub content: String,
    /// Display-only progress in percent (0..=100). Not persisted.
    pub progress: u8,
}

impl SpecificObjective {
    pub fn new(id: impl Into<String>, content: impl Into<String>, progress: u8) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            progress: progress.min(100),
        }
    }

    /// Numeric suffix of an `oe<N>` identifier, if the id follows that scheme.
    pub fn sequence(&self) -> Option<u32> {
        parse_objective_sequence(self.id.as_str())
    }
}

/// Acceptance criterion card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub content: String,
    pub status: CriterionStatus,
}

impl Criterion {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            status: CriterionStatus::Pending,
        }
    }
}

/// One row of the constraints table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstraintRow {
    pub parameter: String,
    pub value: String,
}

impl ConstraintRow {
    pub fn new(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}

/// Reference to a deletable document item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemRef {
    /// Specific objective by id.
    Objective(String),
    /// Constraint row by zero-based display position.
    ConstraintRow(usize),
}

impl Display for ItemRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Objective(id) => write!(f, "objective:{id}"),
            Self::ConstraintRow(index) => write!(f, "constraint_row:{index}"),
        }
    }
}

/// Reference to one editable text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextField {
    Title,
    Objective,
    SpecificObjective(String),
    InScope(usize),
    OutScope(usize),
    Criterion(String),
    ConstraintParameter(usize),
    ConstraintValue(usize),
}

impl Display for TextField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Objective => write!(f, "objective"),
            Self::SpecificObjective(id) => write!(f, "specific_objective:{id}"),
            Self::InScope(index) => write!(f, "in_scope:{index}"),
            Self::OutScope(index) => write!(f, "out_scope:{index}"),
            Self::Criterion(id) => write!(f, "criterion:{id}"),
            Self::ConstraintParameter(index) => write!(f, "constraint_parameter:{index}"),
            Self::ConstraintValue(index) => write!(f, "constraint_value:{index}"),
        }
    }
}

/// Document invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    DuplicateObjectiveId(String),
    DuplicateCriterionId(String),
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateObjectiveId(id) => write!(f, "duplicate specific objective id `{id}`"),
            Self::DuplicateCriterionId(id) => write!(f, "duplicate criterion id `{id}`"),
        }
    }
}

impl Error for DocumentValidationError {}

/// In-memory scope document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentModel {
    pub title: String,
    pub objective: String,
    pub specific_objectives: Vec<SpecificObjective>,
    pub in_scope: Vec<String>,
    pub out_scope: Vec<String>,
    pub criteria: Vec<Criterion>,
    pub constraints: Vec<ConstraintRow>,
}

impl DocumentModel {
    /// Creates a document with no content at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in page content used whenever nothing is restored from storage.
    pub fn builtin() -> Self {
        Self {
            title: "Definición de Alcance del Proyecto".to_string(),
            objective: "Desarrollar una plataforma web que centralice la gestión de \
                        solicitudes internas, reduciendo los tiempos de respuesta y \
                        mejorando la trazabilidad de cada caso."
                .to_string(),
            specific_objectives: vec![
                SpecificObjective::new(
                    "oe1",
                    "Levantar y documentar los requerimientos funcionales con las áreas usuarias.",
                    100,
                ),
                SpecificObjective::new(
                    "oe2",
                    "Diseñar la arquitectura y el modelo de datos de la plataforma.",
                    75,
                ),
                SpecificObjective::new(
                    "oe3",
                    "Implementar los módulos de registro, seguimiento y reportes.",
                    40,
                ),
                SpecificObjective::new(
                    "oe4",
                    "Capacitar a los usuarios finales y realizar la puesta en producción.",
                    0,
                ),
            ],
            in_scope: vec![
                "Registro y seguimiento de solicitudes".to_string(),
                "Panel de indicadores para supervisores".to_string(),
                "Notificaciones por correo electrónico".to_string(),
                "Manual de usuario y capacitación".to_string(),
            ],
            out_scope: vec![
                "Aplicación móvil nativa".to_string(),
                "Integración con sistemas contables".to_string(),
                "Migración de datos históricos anteriores a 2020".to_string(),
            ],
            criteria: vec![
                Criterion::new("c1", "El 100% de los requerimientos aprobados están implementados."),
                Criterion::new("c2", "El tiempo de respuesta promedio es menor a 2 segundos."),
                Criterion::new("c3", "Las pruebas de aceptación son firmadas por el patrocinador."),
                Criterion::new("c4", "Los usuarios clave completaron la capacitación."),
            ],
            constraints: vec![
                ConstraintRow::new("Presupuesto", "USD 45.000"),
                ConstraintRow::new("Fecha límite", "30/09/2025"),
                ConstraintRow::new("Equipo", "4 desarrolladores, 1 analista"),
                ConstraintRow::new("Tecnología", "Stack web corporativo"),
            ],
        }
    }

    /// Checks document invariants.
    ///
    /// # Errors
    /// - Returns the first duplicated objective or criterion id found.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        let mut seen = HashSet::new();
        for objective in &self.specific_objectives {
            if !seen.insert(objective.id.as_str()) {
                return Err(DocumentValidationError::DuplicateObjectiveId(
                    objective.id.clone(),
                ));
            }
        }

        seen.clear();
        for criterion in &self.criteria {
            if !seen.insert(criterion.id.as_str()) {
                return Err(DocumentValidationError::DuplicateCriterionId(
                    criterion.id.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Highest `oe<N>` suffix currently present, or 0.
    pub fn max_objective_sequence(&self) -> u32 {
        self.specific_objectives
            .iter()
            .filter_map(SpecificObjective::sequence)
            .max()
            .unwrap_or(0)
    }

    pub fn objective(&self, id: &str) -> Option<&SpecificObjective> {
        self.specific_objectives.iter().find(|item| item.id == id)
    }

    pub fn criterion_mut(&mut self, id: &str) -> Option<&mut Criterion> {
        self.criteria.iter_mut().find(|item| item.id == id)
    }

    /// Whether `item` currently resolves to an entry.
    pub fn contains_item(&self, item: &ItemRef) -> bool {
        match item {
            ItemRef::Objective(id) => self.objective(id).is_some(),
            ItemRef::ConstraintRow(index) => *index < self.constraints.len(),
        }
    }

    /// Removes the referenced item. Returns `false` when nothing matched.
    pub fn remove_item(&mut self, item: &ItemRef) -> bool {
        match item {
            ItemRef::Objective(id) => {
                let before = self.specific_objectives.len();
                self.specific_objectives.retain(|objective| objective.id != *id);
                self.specific_objectives.len() != before
            }
            ItemRef::ConstraintRow(index) => {
                if *index < self.constraints.len() {
                    self.constraints.remove(*index);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Replaces the text of one field. Returns `false` when the field does not resolve.
    pub fn set_text(&mut self, field: &TextField, text: impl Into<String>) -> bool {
        let text = text.into();
        let slot = match field {
            TextField::Title => Some(&mut self.title),
            TextField::Objective => Some(&mut self.objective),
            TextField::SpecificObjective(id) => self
                .specific_objectives
                .iter_mut()
                .find(|item| item.id == *id)
                .map(|item| &mut item.content),
            TextField::InScope(index) => self.in_scope.get_mut(*index),
            TextField::OutScope(index) => self.out_scope.get_mut(*index),
            TextField::Criterion(id) => self.criterion_mut(id).map(|item| &mut item.content),
            TextField::ConstraintParameter(index) => {
                self.constraints.get_mut(*index).map(|row| &mut row.parameter)
            }
            TextField::ConstraintValue(index) => {
                self.constraints.get_mut(*index).map(|row| &mut row.value)
            }
        };

        match slot {
            Some(slot) => {
                *slot = text;
                true
            }
            None => false,
        }
    }
}

/// Parses the numeric suffix of an `oe<N>` identifier.
pub fn parse_objective_sequence(id: &str) -> Option<u32> {
    OBJECTIVE_ID_RE
        .captures(id)
        .and_then(|caps| caps.get(1))
        .and_then(|value| value.as_str().parse().ok())
}

/// Formats the identifier for objective number `sequence`.
pub fn format_objective_id(sequence: u32) -> String {
    format!("{OBJECTIVE_ID_PREFIX}{sequence}")
}
