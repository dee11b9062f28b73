//! Shared test vectors for every runtime that embeds the policy.
//!
//! A vector is `(mode, purchase_state, query) -> expected`. Expected answers
//! come from [`expected_answer`], a truth table written independently of
//! both policy implementations. The same vectors are checked into
//! `tests/fixtures/gate_vectors.json` so a port in another runtime can run
//! the identical fixture, and [`fingerprint`] lets two runners confirm they
//! saw the same set.

use crate::policy::limits::{WidgetLimit, WidgetLimits, WidgetSize, WidgetType};
use crate::policy::mode::FeatureMode;
use crate::policy::GatePolicy;
use crate::GateError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Widget counts sampled for `can_add_widget` vectors.
pub const COUNT_SAMPLES: [u32; 5] = [0, 1, 2, 5, 100];

/// One policy question with its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Query {
    /// `is_pro_effective`
    IsProEffective,
    /// `can_show_seconds`
    CanShowSeconds,
    /// `can_add_widget`
    CanAddWidget {
        /// Placed home widgets.
        home: u32,
        /// Placed lock-screen widgets.
        lockscreen: u32,
        /// Type being added.
        widget_type: WidgetType,
    },
    /// `is_widget_size_usable`
    IsWidgetSizeUsable {
        /// Size asked about.
        size: WidgetSize,
    },
    /// `is_widget_size_previewable`
    IsWidgetSizePreviewable {
        /// Size asked about.
        size: WidgetSize,
    },
    /// `widget_limits`
    WidgetLimits,
}

impl Query {
    /// Every query in the sampled domain, in fixture order.
    pub fn samples() -> Vec<Query> {
        let mut queries = vec![Query::IsProEffective, Query::CanShowSeconds];
        for widget_type in WidgetType::ALL {
            for home in COUNT_SAMPLES {
                for lockscreen in COUNT_SAMPLES {
                    queries.push(Query::CanAddWidget {
                        home,
                        lockscreen,
                        widget_type,
                    });
                }
            }
        }
        queries.extend(WidgetSize::ALL.map(|size| Query::IsWidgetSizeUsable { size }));
        queries.extend(WidgetSize::ALL.map(|size| Query::IsWidgetSizePreviewable { size }));
        queries.push(Query::WidgetLimits);
        queries
    }

    /// Ask `policy` this question.
    pub fn ask<P: GatePolicy + ?Sized>(&self, policy: &P, purchase_state: bool) -> Answer {
        match *self {
            Query::IsProEffective => Answer::Bool(policy.is_pro_effective(purchase_state)),
            Query::CanShowSeconds => Answer::Bool(policy.can_show_seconds(purchase_state)),
            Query::CanAddWidget {
                home,
                lockscreen,
                widget_type,
            } => Answer::Bool(policy.can_add_widget(home, lockscreen, widget_type, purchase_state)),
            Query::IsWidgetSizeUsable { size } => {
                Answer::Bool(policy.is_widget_size_usable(size, purchase_state))
            }
            Query::IsWidgetSizePreviewable { size } => {
                Answer::Bool(policy.is_widget_size_previewable(size, purchase_state))
            }
            Query::WidgetLimits => Answer::Limits(policy.widget_limits(purchase_state)),
        }
    }
}

/// A policy answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Yes/no answer.
    Bool(bool),
    /// Widget limits.
    Limits(WidgetLimits),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Bool(value) => write!(f, "{}", value),
            Answer::Limits(limits) => {
                write!(f, "home={} lockscreen={}", limits.home, limits.lockscreen)
            }
        }
    }
}

/// The answer the rules require, independent of any implementation.
pub fn expected_answer(mode: FeatureMode, purchase_state: bool, query: &Query) -> Answer {
    let pro = match mode {
        FeatureMode::Free => false,
        FeatureMode::Pro => true,
        FeatureMode::Normal => purchase_state,
    };

    match *query {
        Query::IsProEffective | Query::CanShowSeconds => Answer::Bool(pro),
        Query::CanAddWidget {
            home,
            lockscreen,
            widget_type,
        } => {
            let placed = match widget_type {
                WidgetType::Home => home,
                WidgetType::Lockscreen => lockscreen,
            };
            Answer::Bool(pro || placed == 0)
        }
        Query::IsWidgetSizeUsable { size } => Answer::Bool(pro || size == WidgetSize::Small),
        Query::IsWidgetSizePreviewable { .. } => Answer::Bool(true),
        Query::WidgetLimits => {
            let limit = if pro {
                WidgetLimit::Unlimited
            } else {
                WidgetLimit::Finite(1)
            };
            Answer::Limits(WidgetLimits {
                home: limit,
                lockscreen: limit,
            })
        }
    }
}

/// A single fixture row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestVector {
    /// Build mode under test.
    pub mode: FeatureMode,
    /// Runtime purchase flag.
    pub purchase_state: bool,
    /// Question asked.
    pub query: Query,
    /// Required answer.
    pub expected: Answer,
}

impl TestVector {
    /// The full sampled cross-product of modes, purchase states and queries.
    pub fn grid() -> Vec<TestVector> {
        let queries = Query::samples();
        let mut vectors = Vec::with_capacity(FeatureMode::ALL.len() * 2 * queries.len());
        for mode in FeatureMode::ALL {
            for purchase_state in [false, true] {
                for query in &queries {
                    vectors.push(TestVector {
                        mode,
                        purchase_state,
                        query: *query,
                        expected: expected_answer(mode, purchase_state, query),
                    });
                }
            }
        }
        vectors
    }
}

/// A vector an implementation got wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// The failing vector.
    pub vector: TestVector,
    /// What the implementation answered.
    pub actual: Answer,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mode={} purchase_state={} {:?}: expected {}, got {}",
            self.vector.mode,
            self.vector.purchase_state,
            self.vector.query,
            self.vector.expected,
            self.actual
        )
    }
}

/// Run `vectors` against policies built by `factory` for each vector's mode.
pub fn run_vectors<P, F>(factory: F, vectors: &[TestVector]) -> Vec<Mismatch>
where
    P: GatePolicy,
    F: Fn(FeatureMode) -> P,
{
    vectors
        .iter()
        .filter_map(|vector| {
            let policy = factory(vector.mode);
            let actual = vector.query.ask(&policy, vector.purchase_state);
            (actual != vector.expected).then_some(Mismatch {
                vector: *vector,
                actual,
            })
        })
        .collect()
}

/// Parse a JSON fixture.
pub fn load_vectors(json: &str) -> Result<Vec<TestVector>, GateError> {
    serde_json::from_str(json)
        .map_err(|e| GateError::FixtureError(format!("Failed to parse vectors: {}", e)))
}

/// Render vectors as a pretty JSON fixture.
pub fn to_json(vectors: &[TestVector]) -> Result<String, GateError> {
    serde_json::to_string_pretty(vectors)
        .map_err(|e| GateError::FixtureError(format!("Failed to serialize vectors: {}", e)))
}

/// Hex SHA-256 of the compact JSON encoding of `vectors`.
pub fn fingerprint(vectors: &[TestVector]) -> Result<String, GateError> {
    let json = serde_json::to_string(vectors)
        .map_err(|e| GateError::FixtureError(format!("Failed to serialize vectors: {}", e)))?;
    Ok(hex::encode(Sha256::digest(json.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::gate::FeatureGate;
    use crate::widget::policy::WidgetPolicy;

    #[test]
    fn test_grid_size() {
        let per_mode = Query::samples().len();
        assert_eq!(per_mode, 2 + 2 * COUNT_SAMPLES.len() * COUNT_SAMPLES.len() + 3 + 3 + 1);
        assert_eq!(TestVector::grid().len(), 3 * 2 * per_mode);
    }

    #[test]
    fn test_app_gate_passes_grid() {
        let mismatches = run_vectors(FeatureGate::new, &TestVector::grid());
        assert!(mismatches.is_empty(), "{:?}", mismatches);
    }

    #[test]
    fn test_widget_policy_passes_grid() {
        let mismatches = run_vectors(WidgetPolicy::new, &TestVector::grid());
        assert!(mismatches.is_empty(), "{:?}", mismatches);
    }

    #[test]
    fn test_runner_reports_wrong_answers() {
        struct AlwaysPro;
        impl GatePolicy for AlwaysPro {
            fn build_mode(&self) -> FeatureMode {
                FeatureMode::Pro
            }
            fn is_pro_effective(&self, _: bool) -> bool {
                true
            }
            fn can_add_widget(&self, _: u32, _: u32, _: WidgetType, _: bool) -> bool {
                true
            }
            fn can_show_seconds(&self, _: bool) -> bool {
                true
            }
            fn is_widget_size_usable(&self, _: WidgetSize, _: bool) -> bool {
                true
            }
            fn is_widget_size_previewable(&self, _: WidgetSize, _: bool) -> bool {
                true
            }
            fn widget_limits(&self, _: bool) -> WidgetLimits {
                WidgetLimits {
                    home: WidgetLimit::Unlimited,
                    lockscreen: WidgetLimit::Unlimited,
                }
            }
        }

        let vectors: Vec<_> = TestVector::grid()
            .into_iter()
            .filter(|v| v.mode == FeatureMode::Free)
            .collect();
        let mismatches = run_vectors(|_| AlwaysPro, &vectors);
        assert!(!mismatches.is_empty());
        assert!(mismatches
            .iter()
            .all(|m| m.vector.expected != m.actual && m.vector.mode == FeatureMode::Free));
        assert!(mismatches[0].to_string().starts_with("mode=FREE"));
    }

    #[test]
    fn test_json_roundtrip_keeps_fingerprint() {
        let grid = TestVector::grid();
        let loaded = load_vectors(&to_json(&grid).unwrap()).unwrap();
        assert_eq!(loaded, grid);
        assert_eq!(fingerprint(&loaded).unwrap(), fingerprint(&grid).unwrap());
    }

    #[test]
    fn test_wire_format() {
        let vector = TestVector {
            mode: FeatureMode::Normal,
            purchase_state: false,
            query: Query::CanAddWidget {
                home: 1,
                lockscreen: 0,
                widget_type: WidgetType::Home,
            },
            expected: Answer::Bool(false),
        };
        assert_eq!(
            serde_json::to_string(&vector).unwrap(),
            r#"{"mode":"NORMAL","purchase_state":false,"query":{"op":"can_add_widget","home":1,"lockscreen":0,"widget_type":"home"},"expected":false}"#
        );
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(matches!(load_vectors("{}"), Err(GateError::FixtureError(_))));
    }
}
