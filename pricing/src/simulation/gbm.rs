use crate::common::models::MarketParameters;

/// Model params for the SDE
/// '''math
/// dS_t / S_t = mu dt + sigma dW_t
/// ''', where $dW_t ~ N(0, sqrt(dt))$
/// https://en.wikipedia.org/wiki/Geometric_Brownian_motion
#[derive(Debug, Clone, Copy)]
pub struct GeometricBrownianMotion {
    initial_value: f64,
    /// drift term
    mu: f64,
    /// volatility
    sigma: f64,
    /// change in time
    dt: f64,
}

impl GeometricBrownianMotion {
    pub fn new(initial_value: f64, drift: f64, vola: f64, dt: f64) -> Self {
        Self {
            initial_value,
            mu: drift,
            dt,
            sigma: vola,
        }
    }

    /// Under the risk neutral measure the drift is `rate - divid`.
    pub fn risk_neutral(market: &MarketParameters, dt: f64) -> Self {
        Self::new(market.spot, market.carry(), market.vol, dt)
    }

    /// Exact log-normal step, free of discretization bias.
    /// See https://en.wikipedia.org/wiki/Geometric_Brownian_motion
    #[inline]
    pub fn step_analytic(&self, st: f64, z: f64) -> f64 {
        let ret = self.dt * (self.mu - self.sigma.powi(2) / 2.0) + self.dt.sqrt() * self.sigma * z;
        st * ret.exp()
    }

    /// Price path `[S_0, S_1, ..., S_n]` driven by `n` standard normals.
    pub fn generate_path(&self, standard_normals: &[f64]) -> Vec<f64> {
        let mut path = Vec::with_capacity(standard_normals.len() + 1);

        let mut curr_p = self.initial_value;
        path.push(curr_p);

        for z in standard_normals {
            curr_p = self.step_analytic(curr_p, *z);
            path.push(curr_p);
        }

        path
    }
}
