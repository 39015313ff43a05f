use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rand_hc::Hc128Rng;

/// Random number generator of one simulation request.
///
/// Every request owns its generator; equal seeds reproduce equal paths.
pub fn generator(seed_nr: u64) -> Hc128Rng {
    Hc128Rng::seed_from_u64(seed_nr)
}

pub struct MonteCarloPathSimulator {
    pub nr_paths: usize,
    pub nr_steps: usize,
}

impl MonteCarloPathSimulator {
    pub fn new(nr_paths: usize, nr_steps: usize) -> Self {
        Self { nr_paths, nr_steps }
    }

    /// Draws `nr_steps` samples of `distr` per path and maps them through `path_fn`.
    pub fn simulate_paths_with<D>(
        &self,
        seed_nr: u64,
        distr: D,
        path_fn: impl Fn(&PathSlice) -> Path,
    ) -> Vec<Path>
    where
        D: Distribution<f64> + Copy,
    {
        let mut rn_generator = generator(seed_nr);
        let mut paths = Vec::with_capacity(self.nr_paths);
        let mut randoms = vec![0.0; self.nr_steps];

        for _ in 0..self.nr_paths {
            for (z, sample) in randoms.iter_mut().zip((&mut rn_generator).sample_iter(distr)) {
                *z = sample;
            }
            paths.push(path_fn(&randoms));
        }
        paths
    }

    pub fn simulate_standard_normal_paths(
        &self,
        seed_nr: u64,
        path_fn: impl Fn(&PathSlice) -> Path,
    ) -> Vec<Path> {
        self.simulate_paths_with(seed_nr, StandardNormal, path_fn)
    }
}

pub type Path = Vec<f64>;
pub type PathSlice = [f64];

pub struct PathEvaluator<'a> {
    paths: &'a [Path],
}

impl<'a> PathEvaluator<'a> {
    pub fn new(paths: &'a [Path]) -> Self {
        Self { paths }
    }

    pub fn evaluate(&self, path_fn: impl Fn(&'a Path) -> Option<f64>) -> Vec<Option<f64>> {
        self.paths.iter().map(path_fn).collect()
    }

    /// Average over all paths; paths without a value count as zero.
    pub fn evaluate_average(&self, path_fn: impl Fn(&'a Path) -> Option<f64>) -> Option<f64> {
        let mut valued = 0;
        let total: f64 = self
            .paths
            .iter()
            .filter_map(|path| path_fn(path))
            .inspect(|_| valued += 1)
            .sum();
        if valued == 0 {
            return None;
        }
        Some(total / self.paths.len() as f64)
    }
}
