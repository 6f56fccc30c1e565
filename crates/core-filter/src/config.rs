//! Declarative filter configuration.
//!
//! A [`FilterConfig`] is a plain-data description of an engine (policies,
//! requirement rules, matchers) that can be stored in TOML and lowered into
//! the runtime policy graph with [`FilterConfig::build`]. Deserialization
//! validates structural limits up front; pattern compilation and expression
//! parsing happen during lowering, so every configuration error surfaces at
//! load time and none at evaluation time.
//!
//! ```toml
//! engine_id = "default"
//!
//! [[policies]]
//! id = "research-scholarship"
//!
//! [policies.when]
//! type = "entity_attribute"
//! name = "http://macedir.org/entity-category"
//! value = "http://refeds.org/category/research-and-scholarship"
//!
//! [[policies.rules]]
//! attribute = "eduPersonAffiliation"
//! matcher = { type = "any" }
//! ```

use crate::attribute_rule::AttributeRule;
use crate::builder::AttributeFilterBuilder;
use crate::engine::AttributeFilter;
use crate::error::{FilterError, Result};
use crate::expr::ExpressionRule;
use crate::matcher::logic::{AndMatcher, NotMatcher, OrMatcher};
use crate::matcher::metadata::RequestedInMetadataMatcher;
use crate::matcher::value::{ScopeMatcher, ValueStringMatcher};
use crate::matcher::{MatchAll, MatchNone, Matcher};
use crate::pattern::ValuePattern;
use crate::policy::AttributeFilterPolicy;
use crate::rule::logic::{AndRule, OrRule};
use crate::rule::metadata::{
    EntityAttributeRule, EntityGroupRule, NameIdFormatRule, RegistrationAuthorityRule,
};
use crate::rule::request::{FactRule, RequestFact};
use crate::rule::{AlwaysRule, NeverRule, PolicyRequirementRule};
use crate::{MAX_POLICIES_PER_ENGINE, MAX_RULES_PER_POLICY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const fn default_true() -> bool {
    true
}

/// Literal-or-regex pattern in configuration form.
///
/// Exactly one of `value` (literal) and `pattern` (regex) must be given;
/// `case_sensitive` only applies to literals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Literal string to compare against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Regex pattern to match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Case sensitivity for literal comparison
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
}

impl PatternSpec {
    /// Literal pattern spec
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            pattern: None,
            case_sensitive: true,
        }
    }

    /// Regex pattern spec
    #[must_use]
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            value: None,
            pattern: Some(pattern.into()),
            case_sensitive: true,
        }
    }

    fn compile(&self) -> Result<ValuePattern> {
        match (&self.value, &self.pattern) {
            (Some(value), None) => Ok(if self.case_sensitive {
                ValuePattern::exact(value)
            } else {
                ValuePattern::exact_ignore_case(value)
            }),
            (None, Some(pattern)) => ValuePattern::regex(pattern),
            _ => Err(FilterError::MissingField {
                component: "PatternSpec",
                field: "value or pattern (exactly one)",
            }),
        }
    }
}

/// Matcher description in configuration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatcherSpec {
    /// Match every value
    Any,
    /// Match no values
    None,
    /// Match values by string form
    Value {
        /// Pattern applied to each value's string form
        #[serde(flatten)]
        pattern: PatternSpec,
    },
    /// Match scoped values by scope part
    Scope {
        /// Pattern applied to each value's scope part
        #[serde(flatten)]
        pattern: PatternSpec,
    },
    /// Match the values the requester asks for in its metadata
    RequestedInMetadata {
        /// Match everything when no metadata snapshot is available
        #[serde(default)]
        match_if_metadata_silent: bool,
        /// Only honor entries the requester marks required
        #[serde(default)]
        only_if_required: bool,
    },
    /// Intersection of child matchers
    And {
        /// Child matcher specs
        children: Vec<MatcherSpec>,
    },
    /// Union of child matchers
    Or {
        /// Child matcher specs
        children: Vec<MatcherSpec>,
    },
    /// Complement of a child matcher
    Not {
        /// Child matcher spec
        child: Box<MatcherSpec>,
    },
}

impl MatcherSpec {
    fn build(&self) -> Result<Arc<dyn Matcher>> {
        Ok(match self {
            Self::Any => Arc::new(MatchAll),
            Self::None => Arc::new(MatchNone),
            Self::Value { pattern } => Arc::new(ValueStringMatcher::new(pattern.compile()?)),
            Self::Scope { pattern } => Arc::new(ScopeMatcher::new(pattern.compile()?)),
            Self::RequestedInMetadata {
                match_if_metadata_silent,
                only_if_required,
            } => Arc::new(
                RequestedInMetadataMatcher::new()
                    .match_if_metadata_silent(*match_if_metadata_silent)
                    .only_if_required(*only_if_required),
            ),
            Self::And { children } => {
                let children = children.iter().map(Self::build).collect::<Result<_>>()?;
                Arc::new(AndMatcher::new(children)?)
            }
            Self::Or { children } => {
                let children = children.iter().map(Self::build).collect::<Result<_>>()?;
                Arc::new(OrMatcher::new(children)?)
            }
            Self::Not { child } => Arc::new(NotMatcher::new(child.build()?)),
        })
    }
}

/// Requirement rule description in configuration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequirementSpec {
    /// Applies to every request
    Any,
    /// Applies to no request
    None,
    /// Test one request fact
    Fact {
        /// Which fact to test
        fact: RequestFact,
        /// Pattern applied to the fact
        #[serde(flatten)]
        pattern: PatternSpec,
    },
    /// Test an entity attribute in the requester's metadata
    EntityAttribute {
        /// Entity attribute name
        name: String,
        /// Pattern applied to the attribute's values
        #[serde(flatten)]
        pattern: PatternSpec,
    },
    /// Require membership in a metadata group
    EntityGroup {
        /// Group name
        group: String,
    },
    /// Test the registration authority
    RegistrationAuthority {
        /// Acceptable authorities
        authorities: Vec<String>,
        /// Outcome when metadata carries no registration info
        #[serde(default)]
        match_if_metadata_silent: bool,
    },
    /// Require support for a NameID format
    NameidFormat {
        /// The format URI
        format: String,
    },
    /// Evaluate a fact expression
    Expression {
        /// Expression source text
        expr: String,
    },
    /// All children must apply
    And {
        /// Child requirement specs
        children: Vec<RequirementSpec>,
    },
    /// Any child must apply
    Or {
        /// Child requirement specs
        children: Vec<RequirementSpec>,
    },
}

impl RequirementSpec {
    fn build(&self) -> Result<Arc<dyn PolicyRequirementRule>> {
        Ok(match self {
            Self::Any => Arc::new(AlwaysRule),
            Self::None => Arc::new(NeverRule),
            Self::Fact { fact, pattern } => Arc::new(FactRule::new(*fact, pattern.compile()?)),
            Self::EntityAttribute { name, pattern } => {
                Arc::new(EntityAttributeRule::new(name, pattern.compile()?))
            }
            Self::EntityGroup { group } => Arc::new(EntityGroupRule::new(group)),
            Self::RegistrationAuthority {
                authorities,
                match_if_metadata_silent,
            } => Arc::new(
                RegistrationAuthorityRule::new(authorities.clone())
                    .match_if_metadata_silent(*match_if_metadata_silent),
            ),
            Self::NameidFormat { format } => Arc::new(NameIdFormatRule::new(format)),
            Self::Expression { expr } => Arc::new(ExpressionRule::new(expr)?),
            Self::And { children } => {
                let children = children.iter().map(Self::build).collect::<Result<_>>()?;
                Arc::new(AndRule::new(children)?)
            }
            Self::Or { children } => {
                let children = children.iter().map(Self::build).collect::<Result<_>>()?;
                Arc::new(OrRule::new(children)?)
            }
        })
    }
}

/// One attribute rule in configuration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// ID of the attribute the rule applies to
    pub attribute: String,

    /// Whether matched values are denied rather than permitted
    #[serde(default)]
    pub deny: bool,

    /// The value matcher
    pub matcher: MatcherSpec,
}

/// One filter policy in configuration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Policy ID; unqualified policies are assigned `policy-N` at build time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Requirement gating the policy; omitted means it always applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<RequirementSpec>,

    /// The policy's attribute rules
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// A complete engine description.
///
/// Fields are private to enforce validation through deserialization: the
/// `#[serde(try_from)]` attribute runs the structural limit checks on every
/// deserialized configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "FilterConfigRaw")]
pub struct FilterConfig {
    /// ID of the engine to build
    engine_id: String,

    /// Policy descriptions, in application order
    policies: Vec<PolicyConfig>,
}

/// Raw configuration structure for deserialization (internal use only).
#[derive(Debug, Clone, Deserialize)]
struct FilterConfigRaw {
    engine_id: String,
    #[serde(default)]
    policies: Vec<PolicyConfig>,
}

impl TryFrom<FilterConfigRaw> for FilterConfig {
    type Error = FilterError;

    fn try_from(raw: FilterConfigRaw) -> Result<Self> {
        if raw.engine_id.trim().is_empty() {
            return Err(FilterError::EmptyId {
                component: "FilterConfig",
            });
        }
        if raw.policies.len() > MAX_POLICIES_PER_ENGINE {
            return Err(FilterError::TooManyPolicies {
                max: MAX_POLICIES_PER_ENGINE,
                attempted: raw.policies.len(),
            });
        }
        for policy in &raw.policies {
            if policy.rules.len() > MAX_RULES_PER_POLICY {
                return Err(FilterError::TooManyRules {
                    max: MAX_RULES_PER_POLICY,
                    attempted: policy.rules.len(),
                });
            }
        }
        Ok(Self {
            engine_id: raw.engine_id,
            policies: raw.policies,
        })
    }
}

impl FilterConfig {
    /// The engine ID this configuration describes
    #[must_use]
    pub fn engine_id(&self) -> &str {
        &self.engine_id
    }

    /// The policy descriptions
    #[must_use]
    pub fn policies(&self) -> &[PolicyConfig] {
        &self.policies
    }

    /// Load a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if TOML parsing or structural validation fails.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize this configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Serialization`] if TOML serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| FilterError::Serialization(e.to_string()))
    }

    /// Lower this configuration into a runtime engine.
    ///
    /// Policies without an explicit ID are assigned `policy-N` by position.
    ///
    /// # Errors
    ///
    /// Surfaces every configuration error the runtime constructors detect:
    /// invalid patterns and expressions, empty composites, limit violations.
    pub fn build(&self) -> Result<AttributeFilter> {
        let mut builder = AttributeFilterBuilder::new(&self.engine_id);

        for (index, policy) in self.policies.iter().enumerate() {
            let id = match &policy.id {
                Some(id) => id.clone(),
                None => format!("policy-{}", index + 1),
            };

            let requirement = match &policy.when {
                Some(spec) => spec.build()?,
                None => Arc::new(AlwaysRule),
            };

            let mut rules = Vec::with_capacity(policy.rules.len());
            for rule in &policy.rules {
                rules.push(AttributeRule::new(
                    &rule.attribute,
                    rule.matcher.build()?,
                    rule.deny,
                )?);
            }

            builder = builder.add_policy(AttributeFilterPolicy::new(id, requirement, rules)?);
        }

        builder.build()
    }
}
