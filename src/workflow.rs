//! Three-step workflow: flower cost, product composition, preview.
//!
//! [`WorkflowState`] is a plain value whose variants carry exactly the data
//! each step needs, so "step 2 without a flower" cannot be expressed.
//! [`WorkflowState::transition`] is pure; [`Workflow`] owns the current state
//! and is the only thing that replaces it.

use log::{debug, warn};

use crate::forms::{FlowerForm, ProductForm, QuantityPolicy};
use crate::model::{FlowerData, ProductData};
use crate::pricing::Financials;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CostCalculation,
    ProductCreation,
    Preview,
}

impl Step {
    /// 1-based position, as shown in the progress indicator
    pub fn number(self) -> u8 {
        match self {
            Step::CostCalculation => 1,
            Step::ProductCreation => 2,
            Step::Preview => 3,
        }
    }

    /// Whether the progress dot for step `n` is lit.
    pub fn is_reached(self, n: u8) -> bool {
        n <= self.number()
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = match self {
            Step::CostCalculation => "Unit price",
            Step::ProductCreation => "Create product",
            Step::Preview => "Preview",
        };
        write!(f, "Step {}: {}", self.number(), title)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum WorkflowState {
    #[default]
    CostCalculation,
    ProductCreation {
        flower: FlowerData,
    },
    Preview {
        flower: FlowerData,
        product: ProductData,
    },
}

/// Requests a view can make of the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    FlowerSubmitted(FlowerData),
    ProductSubmitted(ProductData),
    Back,
    Reset,
}

impl WorkflowEvent {
    fn label(&self) -> &'static str {
        match self {
            WorkflowEvent::FlowerSubmitted(_) => "flower submitted",
            WorkflowEvent::ProductSubmitted(_) => "product submitted",
            WorkflowEvent::Back => "back",
            WorkflowEvent::Reset => "reset",
        }
    }
}

impl WorkflowState {
    pub fn step(&self) -> Step {
        match self {
            WorkflowState::CostCalculation => Step::CostCalculation,
            WorkflowState::ProductCreation { .. } => Step::ProductCreation,
            WorkflowState::Preview { .. } => Step::Preview,
        }
    }

    pub fn flower(&self) -> Option<&FlowerData> {
        match self {
            WorkflowState::CostCalculation => None,
            WorkflowState::ProductCreation { flower } | WorkflowState::Preview { flower, .. } => {
                Some(flower)
            }
        }
    }

    pub fn product(&self) -> Option<&ProductData> {
        match self {
            WorkflowState::Preview { product, .. } => Some(product),
            _ => None,
        }
    }

    /// The state `event` leads to, or `None` if the event is not accepted
    /// here. Back is only offered in step 2 and reset only in step 3.
    pub fn transition(&self, event: WorkflowEvent) -> Option<WorkflowState> {
        match (self, event) {
            (WorkflowState::CostCalculation, WorkflowEvent::FlowerSubmitted(flower)) => {
                Some(WorkflowState::ProductCreation { flower })
            }
            (
                WorkflowState::ProductCreation { flower },
                WorkflowEvent::ProductSubmitted(product),
            ) => Some(WorkflowState::Preview {
                flower: flower.clone(),
                product,
            }),
            (WorkflowState::ProductCreation { .. }, WorkflowEvent::Back) => {
                Some(WorkflowState::CostCalculation)
            }
            (WorkflowState::Preview { .. }, WorkflowEvent::Reset) => {
                Some(WorkflowState::CostCalculation)
            }
            _ => None,
        }
    }
}

/// Owner of the authoritative [`WorkflowState`].
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    state: WorkflowState,
    quantity_policy: QuantityPolicy,
}

impl Workflow {
    pub fn new(quantity_policy: QuantityPolicy) -> Self {
        Self {
            state: WorkflowState::CostCalculation,
            quantity_policy,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    pub fn quantity_policy(&self) -> QuantityPolicy {
        self.quantity_policy
    }

    /// Apply `event`. Returns `false` and leaves the state untouched when the
    /// event is not accepted in the current step, or when a submitted product
    /// uses a flower count this workflow's [`QuantityPolicy`] rejects.
    pub fn dispatch(&mut self, event: WorkflowEvent) -> bool {
        let from = self.state.step();
        let label = event.label();
        if let WorkflowEvent::ProductSubmitted(product) = &event {
            if !self.quantity_policy.accepts(product.flower_quantity()) {
                warn!(
                    "workflow: {} flowers not allowed by {:?} policy",
                    product.flower_quantity(),
                    self.quantity_policy
                );
                return false;
            }
        }
        match self.state.transition(event) {
            Some(next) => {
                debug!("workflow: {} -> {} ({})", from, next.step(), label);
                self.state = next;
                true
            }
            None => {
                warn!("workflow: '{}' ignored in {}", label, from);
                false
            }
        }
    }

    /// Validate step 1 and move to step 2 if the form is complete.
    pub fn submit_flower(&mut self, form: &FlowerForm) -> bool {
        if self.step() != Step::CostCalculation {
            return false;
        }
        match form.validate() {
            Some(flower) => self.dispatch(WorkflowEvent::FlowerSubmitted(flower)),
            None => {
                debug!("workflow: flower form incomplete, staying in {}", self.step());
                false
            }
        }
    }

    /// Validate step 2 and move to the preview if the form is complete.
    pub fn submit_product(&mut self, form: &ProductForm) -> bool {
        if self.step() != Step::ProductCreation {
            return false;
        }
        match form.validate(self.quantity_policy) {
            Some(product) => self.dispatch(WorkflowEvent::ProductSubmitted(product)),
            None => {
                debug!("workflow: product form incomplete, staying in {}", self.step());
                false
            }
        }
    }

    pub fn back(&mut self) -> bool {
        self.dispatch(WorkflowEvent::Back)
    }

    pub fn reset(&mut self) -> bool {
        self.dispatch(WorkflowEvent::Reset)
    }

    /// Financials of the finished product, available in the preview step.
    pub fn financials(&self) -> Option<Financials> {
        match &self.state {
            WorkflowState::Preview { flower, product } => Some(product.financials(flower)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageAsset;

    fn flower_form() -> FlowerForm {
        FlowerForm::new("Rosa", "12")
    }

    fn product_form() -> ProductForm {
        ProductForm::new("Ramo", "Doce rosas", "50", "12")
            .with_image(ImageAsset::new("image/jpeg", vec![1, 2, 3]))
    }

    #[test]
    fn starts_at_cost_calculation() {
        let wf = Workflow::default();
        assert_eq!(wf.step(), Step::CostCalculation);
        assert!(wf.state().flower().is_none());
        assert!(wf.financials().is_none());
    }

    #[test]
    fn full_forward_path() {
        let mut wf = Workflow::default();
        assert!(wf.submit_flower(&flower_form()));
        assert_eq!(wf.step(), Step::ProductCreation);
        assert_eq!(wf.state().flower().unwrap().unit_price(), 1.0);

        assert!(wf.submit_product(&product_form()));
        assert_eq!(wf.step(), Step::Preview);
        let f = wf.financials().unwrap();
        assert_eq!(f.total_flower_cost, 12.0);
        assert_eq!(f.profit, 38.0);
        assert_eq!(f.profit_margin, 76.0);
    }

    #[test]
    fn back_and_reset_return_to_start() {
        let mut wf = Workflow::default();
        wf.submit_flower(&flower_form());
        assert!(wf.back());
        assert_eq!(*wf.state(), WorkflowState::CostCalculation);

        wf.submit_flower(&flower_form());
        wf.submit_product(&product_form());
        assert!(wf.reset());
        assert_eq!(*wf.state(), WorkflowState::CostCalculation);
        assert!(wf.state().product().is_none());
    }

    #[test]
    fn out_of_place_events_are_ignored() {
        let mut wf = Workflow::default();
        assert!(!wf.back());
        assert!(!wf.reset());
        assert!(!wf.submit_product(&product_form()));
        assert_eq!(wf.step(), Step::CostCalculation);

        wf.submit_flower(&flower_form());
        assert!(!wf.reset());
        assert!(!wf.submit_flower(&flower_form()));
        assert_eq!(wf.step(), Step::ProductCreation);

        wf.submit_product(&product_form());
        assert!(!wf.back());
        assert_eq!(wf.step(), Step::Preview);
    }

    #[test]
    fn dispatch_enforces_quantity_policy() {
        let mut wf = Workflow::new(QuantityPolicy::Whole);
        wf.submit_flower(&flower_form());
        let half = ProductForm::new("Ramo", "Doce rosas", "50", "2.5")
            .with_image(ImageAsset::new("image/jpeg", vec![1, 2, 3]));
        let product = half.validate(QuantityPolicy::Fractional).unwrap();
        assert!(!wf.dispatch(WorkflowEvent::ProductSubmitted(product)));
        assert_eq!(wf.step(), Step::ProductCreation);
    }

    #[test]
    fn transition_is_pure() {
        let state = WorkflowState::CostCalculation;
        let flower = flower_form().validate().unwrap();
        let next = state.transition(WorkflowEvent::FlowerSubmitted(flower)).unwrap();
        assert_eq!(state.step(), Step::CostCalculation);
        assert_eq!(next.step(), Step::ProductCreation);
    }

    #[test]
    fn progress_indicator() {
        assert!(Step::ProductCreation.is_reached(1));
        assert!(Step::ProductCreation.is_reached(2));
        assert!(!Step::ProductCreation.is_reached(3));
        assert_eq!(Step::Preview.to_string(), "Step 3: Preview");
    }
}
