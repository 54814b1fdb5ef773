/// Bipolar sigmoid: `f(x) = 2 / (1 + e^-x) - 1`, with range (-1, 1).
///
/// The derivative is taken from the activation value rather than the raw
/// input: `f'(x) = (1 + f(x)) * (1 - f(x)) / 2`.  Units only keep their last
/// output, so this form lets them answer `derivative()` without storing `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BipolarSigmoid;

impl BipolarSigmoid {
    pub fn function(x: f64) -> f64 {
        2.0 / (1.0 + (-x).exp()) - 1.0
    }

    /// Derivative expressed through an already computed activation `a`.
    pub fn derivative_from_output(a: f64) -> f64 {
        (1.0 + a) * (1.0 - a) / 2.0
    }

    /// Derivative at the raw input `x`.
    pub fn derivative(x: f64) -> f64 {
        Self::derivative_from_output(Self::function(x))
    }
}
