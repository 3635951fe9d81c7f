//! Rule atoms in the rule knowledge base's SWRL-like language.

use crate::entity::EntityId;

/// Argument of an atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// A rule variable, rendered as `?name`.
    Variable(String),
    /// A named individual from the entity catalog.
    Entity(EntityId),
    /// An integer literal.
    Literal(i64),
}

impl Term {
    pub fn var(name: &str) -> Self {
        Self::Variable(name.to_string())
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "?{v}"),
            Term::Entity(id) => write!(f, "{id}"),
            Term::Literal(n) => write!(f, "{n}"),
        }
    }
}

/// A rule atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Atom {
    /// Class membership, e.g. `Patient(?p)` or `Symptom(fever)`.
    Class { class: String, argument: Term },
    /// Binary property or built-in, e.g. `hasSymptom(?p, fever)` or
    /// `swrlb:lessThan(?age, 50)`.
    Binary {
        predicate: String,
        builtin: bool,
        first: Term,
        second: Term,
    },
}

impl Atom {
    pub fn class(class: &str, argument: Term) -> Self {
        Self::Class {
            class: class.to_string(),
            argument,
        }
    }

    pub fn property(predicate: &str, first: Term, second: Term) -> Self {
        Self::Binary {
            predicate: predicate.to_string(),
            builtin: false,
            first,
            second,
        }
    }

    pub fn builtin(predicate: &str, first: Term, second: Term) -> Self {
        Self::Binary {
            predicate: predicate.to_string(),
            builtin: true,
            first,
            second,
        }
    }

    /// Declarations bind or type terms: every class atom, and every binary
    /// atom between two variables.
    pub fn is_declaration(&self) -> bool {
        match self {
            Atom::Class { .. } => true,
            Atom::Binary { first, second, .. } => first.is_variable() && second.is_variable(),
        }
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Atom::Class { class, argument } => write!(f, "{class}({argument})"),
            Atom::Binary {
                predicate,
                builtin,
                first,
                second,
            } => {
                if *builtin {
                    f.write_str("swrlb:")?;
                }
                write!(f, "{predicate}({first}, {second})")
            }
        }
    }
}
