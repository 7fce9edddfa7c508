//! Clause selection for `function`, `match` and `try`.
//!
//! Clauses are tried top to bottom. A clause is selected when its pattern
//! matches and its guard, if any, holds. A failing guard moves on to the
//! next clause; the failed clause is never retried.
//!
//! This layer has no notion of runtime values, so the caller supplies the
//! structural test and the guard evaluation.

use tracing::trace;

use crate::expression::{Case, Expression};
use crate::pattern::Pattern;

/// Index and clause of the first clause whose pattern matches and whose
/// guard holds, or `None` when no clause applies.
///
/// `guard` is only called for clauses whose pattern matched.
pub fn select_case<'a, P, G>(
    cases: &'a [Case],
    mut matches: P,
    mut guard: G,
) -> Option<(usize, &'a Case)>
where
    P: FnMut(&Pattern) -> bool,
    G: FnMut(&Expression) -> bool,
{
    for (index, case) in cases.iter().enumerate() {
        if !matches(&case.pattern) {
            trace!(index, "pattern does not match");
            continue;
        }
        match &case.guard {
            Some(g) if !guard(g) => {
                trace!(index, "guard failed, falling through");
            }
            _ => {
                trace!(index, "clause selected");
                return Some((index, case));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asttypes::Constant;
    use crate::location::{Located, Location};
    use crate::longident::Longident;
    use crate::pattern::PatternDesc;

    fn loc() -> Location {
        Location::none()
    }

    fn int(n: i64) -> Expression {
        Expression::constant(loc(), Constant::Int(n))
    }

    fn bool_lit(b: bool) -> Expression {
        let name = if b { "true" } else { "false" };
        Expression::construct(loc(), Located::new(Longident::ident(name), loc()), None, false)
    }

    fn eval_bool(e: &Expression) -> bool {
        !e.is_false_literal()
    }

    #[test]
    fn test_first_unguarded_match_wins() {
        let cases = vec![
            Case::new(Pattern::constant(loc(), Constant::Int(1)), int(10)),
            Case::new(Pattern::any(loc()), int(20)),
        ];
        let selected = select_case(
            &cases,
            |p| matches!(p.desc, PatternDesc::Any),
            eval_bool,
        );
        assert_eq!(selected.map(|(i, _)| i), Some(1));
    }

    #[test]
    fn test_no_clause_applies() {
        let cases = vec![Case::new(Pattern::constant(loc(), Constant::Int(1)), int(10))];
        assert!(select_case(&cases, |_| false, eval_bool).is_none());
    }

    #[test]
    fn test_guard_not_evaluated_without_pattern_match() {
        let cases = vec![Case::guarded(
            Pattern::constant(loc(), Constant::Int(1)),
            bool_lit(true),
            int(10),
        )];
        let mut guard_calls = 0;
        let selected = select_case(&cases, |_| false, |_| {
            guard_calls += 1;
            true
        });
        assert!(selected.is_none());
        assert_eq!(guard_calls, 0);
    }
}
