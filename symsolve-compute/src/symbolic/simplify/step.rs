/// A rewrite applied by [`simplify_with_steps`](super::simplify_with_steps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Several constants in a sum or product were combined into one, or a power or trig function
    /// of a constant was computed.
    ///
    /// `2+x+3 = x+5`
    FoldConstants,

    /// A sum nested directly inside a sum was merged into it.
    ///
    /// `a+(b+c) = a+b+c`
    FlattenSum,

    /// A product nested directly inside a product was merged into it.
    ///
    /// `a*(b*c) = a*b*c`
    FlattenMul,

    /// `a+0 = a`
    AddZero,

    /// `a*1 = a`
    MultiplyOne,

    /// `a*0 = 0`
    MultiplyZero,

    /// `a^0 = 1`
    PowerZero,

    /// `a^1 = a`
    PowerOne,

    /// `(a^b)^c = a^(b*c)`
    PowerPower,

    /// `sin(c)` or `cos(c)` of a constant `c` was computed.
    EvaluateTrig,
}
