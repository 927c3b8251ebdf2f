//! Evaluation of binary operators over coerced XPath values.

use crate::ast::BinaryOperator;
use crate::engine::XPathValue;
use crate::error::XPathError;
use crate::navigator::Navigator;
use std::collections::HashSet;

/// Applies a binary operator to two already-evaluated operands.
pub fn apply_binary_op<'a, N: Navigator<'a>>(
    op: BinaryOperator,
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    match op {
        BinaryOperator::Or => Ok(XPathValue::Boolean(left.to_bool() || right.to_bool())),
        BinaryOperator::And => Ok(XPathValue::Boolean(left.to_bool() && right.to_bool())),

        BinaryOperator::Equals => Ok(XPathValue::Boolean(compare_equality(&left, &right, false))),
        BinaryOperator::NotEquals => {
            Ok(XPathValue::Boolean(compare_equality(&left, &right, true)))
        }

        BinaryOperator::LessThan => Ok(XPathValue::Boolean(compare_relational(
            &left,
            &right,
            |a, b| a < b,
        ))),
        BinaryOperator::LessThanOrEqual => Ok(XPathValue::Boolean(compare_relational(
            &left,
            &right,
            |a, b| a <= b,
        ))),
        BinaryOperator::GreaterThan => Ok(XPathValue::Boolean(compare_relational(
            &left,
            &right,
            |a, b| a > b,
        ))),
        BinaryOperator::GreaterThanOrEqual => Ok(XPathValue::Boolean(compare_relational(
            &left,
            &right,
            |a, b| a >= b,
        ))),

        BinaryOperator::Plus => Ok(XPathValue::Number(left.to_number() + right.to_number())),
        BinaryOperator::Minus => Ok(XPathValue::Number(left.to_number() - right.to_number())),
        BinaryOperator::Multiply => Ok(XPathValue::Number(left.to_number() * right.to_number())),
        BinaryOperator::Divide => Ok(XPathValue::Number(left.to_number() / right.to_number())),
        BinaryOperator::Modulo => Ok(XPathValue::Number(left.to_number() % right.to_number())),

        BinaryOperator::Union => union(left, right),
    }
}

/// XPath 1.0 equality. When a node-set is involved the comparison is
/// existential: it holds if some member satisfies it. `negate` selects the
/// `!=` form, which for node-sets is NOT the complement of `=`.
fn compare_equality<'a, N: Navigator<'a>>(
    left: &XPathValue<N>,
    right: &XPathValue<N>,
    negate: bool,
) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(a), XPathValue::NodeSet(b)) => a.iter().any(|x| {
            let xv = x.value();
            b.iter().any(|y| (xv == y.value()) != negate)
        }),
        (XPathValue::NodeSet(nodes), other) | (other, XPathValue::NodeSet(nodes)) => match other {
            XPathValue::Number(n) => nodes
                .iter()
                .any(|node| (str_to_number(&node.value()) == *n) != negate),
            XPathValue::String(s) => nodes.iter().any(|node| (node.value() == *s) != negate),
            XPathValue::Boolean(b) => ((!nodes.is_empty()) == *b) != negate,
            // Both-node-set is handled by the first arm.
            XPathValue::NodeSet(_) => false,
        },
        _ => {
            let equal = if matches!(left, XPathValue::Boolean(_))
                || matches!(right, XPathValue::Boolean(_))
            {
                left.to_bool() == right.to_bool()
            } else if matches!(left, XPathValue::Number(_))
                || matches!(right, XPathValue::Number(_))
            {
                left.to_number() == right.to_number()
            } else {
                left.to_string() == right.to_string()
            };
            equal != negate
        }
    }
}

/// Relational comparison is numeric; node-set operands compare existentially
/// through each member's number value.
fn compare_relational<'a, N: Navigator<'a>>(
    left: &XPathValue<N>,
    right: &XPathValue<N>,
    cmp: fn(f64, f64) -> bool,
) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(a), XPathValue::NodeSet(b)) => a.iter().any(|x| {
            let xn = str_to_number(&x.value());
            b.iter().any(|y| cmp(xn, str_to_number(&y.value())))
        }),
        (XPathValue::NodeSet(a), other) => {
            let n = other.to_number();
            a.iter().any(|x| cmp(str_to_number(&x.value()), n))
        }
        (other, XPathValue::NodeSet(b)) => {
            let n = other.to_number();
            b.iter().any(|y| cmp(n, str_to_number(&y.value())))
        }
        _ => cmp(left.to_number(), right.to_number()),
    }
}

/// `|` keeps the left operand's order and appends unseen nodes from the right.
fn union<'a, N: Navigator<'a>>(
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    let (mut nodes, right_nodes) = match (left, right) {
        (XPathValue::NodeSet(a), XPathValue::NodeSet(b)) => (a, b),
        (l, r) => {
            return Err(XPathError::TypeError(format!(
                "union requires node-sets, got {:?} | {:?}",
                l, r
            )));
        }
    };
    let mut seen: HashSet<N> = nodes.iter().copied().collect();
    for node in right_nodes {
        if seen.insert(node) {
            nodes.push(node);
        }
    }
    Ok(XPathValue::NodeSet(nodes))
}

fn str_to_number(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}
