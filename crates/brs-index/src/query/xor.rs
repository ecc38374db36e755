//! Exclusive-or compilation.

use super::CompiledQuery;

/// Compiles `A XOR B XOR ...` as `(A OR B OR ...) AND NOT (A AND B AND ...)`.
///
/// With more than two operands this matches documents hit by at least one
/// operand but not by all of them, which is not parity.
pub fn compile_xor(operands: Vec<CompiledQuery>) -> CompiledQuery {
    if operands.is_empty() {
        return CompiledQuery::Null;
    }
    let all = CompiledQuery::And(operands.clone());
    CompiledQuery::And(vec![CompiledQuery::Or(operands), all.negate()])
}
