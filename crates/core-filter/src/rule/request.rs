//! Rules over the basic request facts.
//!
//! A [`FactRule`] reads one fact from the filter context and applies a
//! [`ValuePattern`]. A fact that is absent from the context makes the rule
//! fail: applicability cannot be decided for a request that never supplied
//! the fact.

use super::{PolicyRequirementRule, Tristate};
use crate::context::AttributeFilterContext;
use crate::pattern::ValuePattern;
use core::fmt;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A fact about the request that leaf rules can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestFact {
    /// The requester (attribute recipient) entity ID
    Requester,
    /// The issuer (this IdP's) entity ID
    Issuer,
    /// The principal name
    Principal,
    /// The principal's authentication method
    AuthnMethod,
}

impl RequestFact {
    fn read<'c>(self, ctx: &'c AttributeFilterContext) -> Option<&'c str> {
        match self {
            Self::Requester => ctx.requester(),
            Self::Issuer => ctx.issuer(),
            Self::Principal => ctx.principal(),
            Self::AuthnMethod => ctx.authn_method(),
        }
    }
}

impl fmt::Display for RequestFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requester => f.write_str("requester"),
            Self::Issuer => f.write_str("issuer"),
            Self::Principal => f.write_str("principal"),
            Self::AuthnMethod => f.write_str("authn_method"),
        }
    }
}

/// Matches one request fact against a pattern.
#[derive(Debug, Clone)]
pub struct FactRule {
    fact: RequestFact,
    pattern: ValuePattern,
}

impl FactRule {
    /// Create a rule testing `fact` against `pattern`
    #[must_use]
    pub fn new(fact: RequestFact, pattern: ValuePattern) -> Self {
        Self { fact, pattern }
    }

    /// Rule over the requester entity ID
    #[must_use]
    pub fn requester(pattern: ValuePattern) -> Self {
        Self::new(RequestFact::Requester, pattern)
    }

    /// Rule over the issuer entity ID
    #[must_use]
    pub fn issuer(pattern: ValuePattern) -> Self {
        Self::new(RequestFact::Issuer, pattern)
    }

    /// Rule over the principal name
    #[must_use]
    pub fn principal(pattern: ValuePattern) -> Self {
        Self::new(RequestFact::Principal, pattern)
    }

    /// Rule over the authentication method
    #[must_use]
    pub fn authn_method(pattern: ValuePattern) -> Self {
        Self::new(RequestFact::AuthnMethod, pattern)
    }
}

impl PolicyRequirementRule for FactRule {
    fn matches(&self, ctx: &AttributeFilterContext) -> Tristate {
        match self.fact.read(ctx) {
            Some(fact) => Tristate::from_bool(self.pattern.matches(fact)),
            None => {
                debug!(fact = %self.fact, "request fact absent; cannot render a decision");
                Tristate::Fail
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requester_rule_matches_the_recipient() {
        let ctx = AttributeFilterContext::new().with_requester("https://sp.example.org");
        let rule = FactRule::requester(ValuePattern::exact("https://sp.example.org"));
        assert_eq!(rule.matches(&ctx), Tristate::True);

        let other = FactRule::requester(ValuePattern::exact("https://other.example.org"));
        assert_eq!(other.matches(&ctx), Tristate::False);
    }

    #[test]
    fn absent_fact_fails() {
        let ctx = AttributeFilterContext::new();
        let rule = FactRule::principal(ValuePattern::exact("jsmith"));
        assert_eq!(rule.matches(&ctx), Tristate::Fail);
    }

    #[test]
    fn regex_variant_matches_entity_id_families() {
        let ctx = AttributeFilterContext::new().with_issuer("https://idp2.example.org/idp");
        let rule = FactRule::issuer(ValuePattern::regex(r"^https://idp\d\.example\.org/").unwrap());
        assert_eq!(rule.matches(&ctx), Tristate::True);
    }

    #[test]
    fn authn_method_rule_reads_the_authentication_fact() {
        let ctx = AttributeFilterContext::new()
            .with_authn_method("urn:oasis:names:tc:SAML:2.0:ac:classes:Password");
        let rule = FactRule::authn_method(ValuePattern::exact(
            "urn:oasis:names:tc:SAML:2.0:ac:classes:Password",
        ));
        assert_eq!(rule.matches(&ctx), Tristate::True);
    }
}
