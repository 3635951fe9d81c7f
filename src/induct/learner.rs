//! Category fan-out and aggregation.
//!
//! One covering task runs per (entity, relation) category on rayon's pool.
//! Tasks share only immutable snapshots. The run is all-or-nothing: after
//! every task has finished, the first failure in category order is reported;
//! otherwise the combined rules are simplified.

use rayon::prelude::*;

use crate::category::{Category, Relation};
use crate::config::InductionConfig;
use crate::entity::EntityCatalog;
use crate::error::{InductionError, InductionResult};
use crate::example::TrainingSet;
use crate::rule::{Rule, simplify_rules};

use super::covering::CoveringTask;
use super::similarity::SimilarityMetric;

/// The rule-induction engine.
#[derive(Debug, Clone)]
pub struct Learner<'a> {
    catalog: &'a EntityCatalog,
    config: InductionConfig,
}

impl<'a> Learner<'a> {
    pub fn new(catalog: &'a EntityCatalog, config: InductionConfig) -> InductionResult<Self> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    pub fn config(&self) -> &InductionConfig {
        &self.config
    }

    /// Every category to learn, relation by relation, targets ordered by id.
    pub fn categories(&self) -> Vec<Category> {
        Relation::ALL
            .into_iter()
            .flat_map(|relation| {
                self.catalog
                    .entities(relation.target_kind())
                    .map(move |entity| Category::new(entity.id.clone(), relation))
            })
            .collect()
    }

    /// Learn the rules of a single category.
    pub fn learn_category(
        &self,
        training: &TrainingSet,
        category: &Category,
    ) -> InductionResult<Vec<Rule>> {
        self.task(training).run(category)
    }

    /// Learn and simplify the rules of every category.
    pub fn learn(&self, training: &TrainingSet) -> InductionResult<Vec<Rule>> {
        let categories = self.categories();
        tracing::info!(
            categories = categories.len(),
            examples = training.len(),
            beam_width = self.config.beam_width,
            "starting rule induction"
        );

        let results = match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| InductionError::ThreadPool {
                        message: e.to_string(),
                    })?;
                pool.install(|| self.fan_out(training, &categories))
            }
            None => self.fan_out(training, &categories),
        };

        let mut rules = Vec::new();
        for (category, result) in categories.iter().zip(results) {
            match result {
                Ok(learned) => rules.extend(learned),
                Err(e) => {
                    tracing::warn!(category = %category, error = %e, "induction failed");
                    return Err(e);
                }
            }
        }

        let learned = rules.len();
        let simplified = simplify_rules(rules);
        tracing::info!(learned, simplified = simplified.len(), "rule induction complete");
        Ok(simplified)
    }

    fn fan_out(
        &self,
        training: &TrainingSet,
        categories: &[Category],
    ) -> Vec<InductionResult<Vec<Rule>>> {
        let task = self.task(training);
        categories.par_iter().map(|category| task.run(category)).collect()
    }

    fn task<'t>(&'t self, training: &'t TrainingSet) -> CoveringTask<'t> {
        CoveringTask::new(
            training,
            SimilarityMetric::new(self.catalog, self.config.bounds),
            &self.config,
        )
    }
}
