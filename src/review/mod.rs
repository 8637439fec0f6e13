/*!
 * Translation review pipeline.
 *
 * - **Dimension**: the scored dimensions and their per-dimension result
 * - **State**: review inputs and the accumulator each stage merges into
 * - **Machine**: stage order and the early-termination rule
 * - **Evaluators**: one evaluator per dimension
 * - **Aggregator**: weighted combination, quality band and explanation
 * - **Orchestrator**: runs a review end to end
 */

pub mod aggregator;
pub mod dimension;
pub mod evaluators;
pub mod machine;
pub mod orchestrator;
pub mod state;

pub use aggregator::{Aggregation, AggregationWeights, QualityLabel, aggregate};
pub use dimension::{Dimension, DimensionScore};
pub use evaluators::{Evaluator, score_terminology};
pub use machine::ReviewStage;
pub use orchestrator::{ReviewPipeline, ReviewReport, run_review};
pub use state::{ReviewInputs, ReviewState, Terminology};
