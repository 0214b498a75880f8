//! The checkout stage machine.
//!
//! Linear and single-threaded: Cart -> Delivery -> Payment -> Complete.
//! Forward transitions validate their own guard conditions; backward
//! transitions preserve everything already entered. The flow holds the cart
//! and both stage forms and never talks to the network - placing the order
//! is a caller-supplied async action invoked from [`CheckoutFlow::pay`].

use serde::Serialize;

use rentflow_core::{Address, CardDetails, CartItem, DeliveryMethod, PaymentMethod};

use crate::cart::Cart;
use crate::error::CheckoutError;
use crate::totals::{OrderTotals, order_totals};

/// The four checkout stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Cart,
    Delivery,
    Payment,
    Complete,
}

impl Default for Stage {
    fn default() -> Self {
        Self::Cart
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Cart => "cart",
            Self::Delivery => "delivery",
            Self::Payment => "payment",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Address and method selection entered on the delivery stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryForm {
    pub address: Option<Address>,
    pub method: Option<DeliveryMethod>,
}

/// Method selection and card fields entered on the payment stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub method: Option<PaymentMethod>,
    pub card: CardDetails,
}

/// Everything handed to the place-order action.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    pub items: Vec<CartItem>,
    pub address: Address,
    pub delivery_method: DeliveryMethod,
    pub payment_method: PaymentMethod,
    /// Card instrument, present only for card-based methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardDetails>,
    pub totals: OrderTotals,
}

/// A shopper's checkout session.
///
/// Owns the current stage, the cart, and both stage forms. Mutable access
/// to each is gated on being in the matching stage, so the legality of
/// every edit and transition lives here rather than in button handlers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutFlow {
    stage: Stage,
    cart: Cart,
    delivery: DeliveryForm,
    payment: PaymentForm,
}

impl CheckoutFlow {
    /// Start a fresh session on the cart stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a session from an existing cart (e.g., restored from session
    /// storage).
    #[must_use]
    pub fn with_cart(cart: Cart) -> Self {
        Self {
            stage: Stage::Cart,
            cart,
            delivery: DeliveryForm::default(),
            payment: PaymentForm::default(),
        }
    }

    /// The current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Read-only cart access, available from any stage.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Read-only delivery form access.
    #[must_use]
    pub const fn delivery(&self) -> &DeliveryForm {
        &self.delivery
    }

    /// Read-only payment form access.
    #[must_use]
    pub const fn payment(&self) -> &PaymentForm {
        &self.payment
    }

    /// Mutable cart access. Item edits are a cart-stage operation.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStage`] outside the cart stage.
    pub fn cart_mut(&mut self) -> Result<&mut Cart, CheckoutError> {
        if let Stage::Cart = self.stage {
            Ok(&mut self.cart)
        } else {
            Err(CheckoutError::WrongStage {
                expected: Stage::Cart,
                actual: self.stage,
            })
        }
    }

    /// Mutable delivery form access, only while on the delivery stage.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStage`] outside the delivery stage.
    pub fn delivery_mut(&mut self) -> Result<&mut DeliveryForm, CheckoutError> {
        if let Stage::Delivery = self.stage {
            Ok(&mut self.delivery)
        } else {
            Err(CheckoutError::WrongStage {
                expected: Stage::Delivery,
                actual: self.stage,
            })
        }
    }

    /// Mutable payment form access, only while on the payment stage.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStage`] outside the payment stage.
    pub fn payment_mut(&mut self) -> Result<&mut PaymentForm, CheckoutError> {
        if let Stage::Payment = self.stage {
            Ok(&mut self.payment)
        } else {
            Err(CheckoutError::WrongStage {
                expected: Stage::Payment,
                actual: self.stage,
            })
        }
    }

    /// Current totals for the cart's item list.
    ///
    /// Every stage's summary panel goes through this one computation.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        order_totals(self.cart.items())
    }

    /// Advance Cart -> Delivery.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when there is nothing to check
    /// out, or [`CheckoutError::WrongStage`] from any other stage. The
    /// stage is unchanged on refusal.
    pub fn proceed_to_delivery(&mut self) -> Result<(), CheckoutError> {
        if self.stage != Stage::Cart {
            return Err(CheckoutError::WrongStage {
                expected: Stage::Cart,
                actual: self.stage,
            });
        }
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.stage = Stage::Delivery;
        tracing::debug!(stage = %self.stage, "checkout advanced");
        Ok(())
    }

    /// Advance Delivery -> Payment.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingDeliveryAddress`] or
    /// [`CheckoutError::MissingDeliveryMethod`] when either selection is
    /// missing, or [`CheckoutError::WrongStage`] from any other stage. The
    /// stage and the entered data are unchanged on refusal.
    pub fn proceed_to_payment(&mut self) -> Result<(), CheckoutError> {
        if self.stage != Stage::Delivery {
            return Err(CheckoutError::WrongStage {
                expected: Stage::Delivery,
                actual: self.stage,
            });
        }
        if self.delivery.address.is_none() {
            return Err(CheckoutError::MissingDeliveryAddress);
        }
        if self.delivery.method.is_none() {
            return Err(CheckoutError::MissingDeliveryMethod);
        }
        self.stage = Stage::Payment;
        tracing::debug!(stage = %self.stage, "checkout advanced");
        Ok(())
    }

    /// Step back one stage, preserving everything entered so far.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NoPreviousStage`] from the cart stage (the
    /// entry point) and from the complete stage (terminal).
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        self.stage = match self.stage {
            Stage::Delivery => Stage::Cart,
            Stage::Payment => Stage::Delivery,
            Stage::Cart | Stage::Complete => return Err(CheckoutError::NoPreviousStage),
        };
        tracing::debug!(stage = %self.stage, "checkout stepped back");
        Ok(())
    }

    /// Pay now: validate the payment form, hand an [`OrderDraft`] to the
    /// caller's place-order action, and advance to Complete on success.
    ///
    /// On success the cart is cleared and the action's value is returned.
    /// On action failure the session stays on the payment stage with every
    /// entered field intact.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingPaymentMethod`] or
    /// [`CheckoutError::IncompleteCardDetails`] when the form guards fail,
    /// [`CheckoutError::WrongStage`] outside the payment stage, and
    /// [`CheckoutError::OrderRejected`] when the action reports failure.
    pub async fn pay<F, Fut, T, E>(&mut self, place_order: F) -> Result<T, CheckoutError>
    where
        F: FnOnce(OrderDraft) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let draft = self.order_draft()?;

        match place_order(draft).await {
            Ok(value) => {
                self.stage = Stage::Complete;
                self.cart.clear();
                tracing::debug!("order placed, checkout complete");
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(error = %err, "order placement failed");
                Err(CheckoutError::OrderRejected(err.to_string()))
            }
        }
    }

    /// Build the order draft the place-order action will receive.
    ///
    /// # Errors
    ///
    /// Same guards as [`CheckoutFlow::pay`], without invoking the action.
    pub fn order_draft(&self) -> Result<OrderDraft, CheckoutError> {
        if self.stage != Stage::Payment {
            return Err(CheckoutError::WrongStage {
                expected: Stage::Payment,
                actual: self.stage,
            });
        }

        let payment_method = self
            .payment
            .method
            .ok_or(CheckoutError::MissingPaymentMethod)?;
        if payment_method.is_card() && !self.payment.card.is_complete() {
            return Err(CheckoutError::IncompleteCardDetails);
        }

        // Both were validated by proceed_to_payment and cannot be edited
        // after leaving the delivery stage.
        let address = self
            .delivery
            .address
            .clone()
            .ok_or(CheckoutError::MissingDeliveryAddress)?;
        let delivery_method = self
            .delivery
            .method
            .ok_or(CheckoutError::MissingDeliveryMethod)?;

        Ok(OrderDraft {
            items: self.cart.items().to_vec(),
            address,
            delivery_method,
            payment_method,
            card: payment_method.is_card().then(|| self.payment.card.clone()),
            totals: self.totals(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use rentflow_core::{CurrencyCode, Money, ProductId, ProductSnapshot, RentalPeriod};

    use super::*;

    fn product() -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(1),
            name: "Pressure washer".to_string(),
            daily_rate: Money::new(Decimal::from(100), CurrencyCode::USD),
            available: 10,
            image_url: None,
        }
    }

    fn period() -> RentalPeriod {
        RentalPeriod::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        )
        .unwrap()
    }

    fn address() -> Address {
        Address {
            recipient: "Sam Doe".to_string(),
            line1: "12 Harbor Rd".to_string(),
            line2: None,
            city: "Portland".to_string(),
            state: "OR".to_string(),
            postal_code: "97201".to_string(),
            country: "US".to_string(),
            phone: None,
        }
    }

    fn flow_at_payment() -> CheckoutFlow {
        let mut flow = CheckoutFlow::new();
        flow.cart_mut().unwrap().add(product(), 2, period()).unwrap();
        flow.proceed_to_delivery().unwrap();
        let delivery = flow.delivery_mut().unwrap();
        delivery.address = Some(address());
        delivery.method = Some(DeliveryMethod::HomeDelivery);
        flow.proceed_to_payment().unwrap();
        flow
    }

    fn complete_card() -> CardDetails {
        CardDetails {
            holder_name: "Sam Doe".to_string(),
            number: "4242424242424242".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
        }
    }

    // =========================================================================
    // Forward guards
    // =========================================================================

    #[test]
    fn test_empty_cart_blocks_checkout() {
        let mut flow = CheckoutFlow::new();
        assert_eq!(flow.proceed_to_delivery(), Err(CheckoutError::EmptyCart));
        assert_eq!(flow.stage(), Stage::Cart);
    }

    #[test]
    fn test_delivery_requires_address_and_method() {
        let mut flow = CheckoutFlow::new();
        flow.cart_mut().unwrap().add(product(), 1, period()).unwrap();
        flow.proceed_to_delivery().unwrap();

        assert_eq!(
            flow.proceed_to_payment(),
            Err(CheckoutError::MissingDeliveryAddress)
        );
        assert_eq!(flow.stage(), Stage::Delivery);

        flow.delivery_mut().unwrap().address = Some(address());
        assert_eq!(
            flow.proceed_to_payment(),
            Err(CheckoutError::MissingDeliveryMethod)
        );
        assert_eq!(flow.stage(), Stage::Delivery);

        flow.delivery_mut().unwrap().method = Some(DeliveryMethod::StorePickup);
        flow.proceed_to_payment().unwrap();
        assert_eq!(flow.stage(), Stage::Payment);
    }

    #[test]
    fn test_transitions_refused_from_wrong_stage() {
        let mut flow = flow_at_payment();
        assert_eq!(
            flow.proceed_to_delivery(),
            Err(CheckoutError::WrongStage {
                expected: Stage::Cart,
                actual: Stage::Payment,
            })
        );
        assert!(flow.cart_mut().is_err());
        assert!(flow.delivery_mut().is_err());
    }

    // =========================================================================
    // Backward transitions
    // =========================================================================

    #[test]
    fn test_back_preserves_cart_and_forms() {
        let mut flow = flow_at_payment();
        flow.payment_mut().unwrap().method = Some(PaymentMethod::PayPal);

        flow.back().unwrap();
        assert_eq!(flow.stage(), Stage::Delivery);
        assert_eq!(flow.delivery().address, Some(address()));

        flow.back().unwrap();
        assert_eq!(flow.stage(), Stage::Cart);
        assert_eq!(flow.cart().total_quantity(), 2);

        assert_eq!(flow.back(), Err(CheckoutError::NoPreviousStage));
    }

    // =========================================================================
    // Totals consistency
    // =========================================================================

    #[test]
    fn test_totals_identical_on_every_stage() {
        let mut flow = CheckoutFlow::new();
        flow.cart_mut().unwrap().add(product(), 2, period()).unwrap();
        let on_cart = flow.totals();

        flow.proceed_to_delivery().unwrap();
        let on_delivery = flow.totals();

        let delivery = flow.delivery_mut().unwrap();
        delivery.address = Some(address());
        delivery.method = Some(DeliveryMethod::HomeDelivery);
        flow.proceed_to_payment().unwrap();
        let on_payment = flow.totals();

        assert_eq!(on_cart, on_delivery);
        assert_eq!(on_delivery, on_payment);
        // 100/day x 2 units x 3 days
        assert_eq!(on_cart.subtotal.amount, Decimal::from(600));
        assert_eq!(on_cart.tax.amount, Decimal::from(60));
        assert_eq!(on_cart.total.amount, Decimal::from(660));
    }

    // =========================================================================
    // Payment
    // =========================================================================

    #[tokio::test]
    async fn test_pay_requires_method() {
        let mut flow = flow_at_payment();
        let result = flow
            .pay(|_draft| async { Ok::<_, String>(()) })
            .await;
        assert_eq!(result, Err(CheckoutError::MissingPaymentMethod));
        assert_eq!(flow.stage(), Stage::Payment);
    }

    #[tokio::test]
    async fn test_pay_card_method_requires_complete_card() {
        let mut flow = flow_at_payment();
        {
            let payment = flow.payment_mut().unwrap();
            payment.method = Some(PaymentMethod::CreditCard);
            payment.card = complete_card();
            payment.card.number = String::new();
        }

        let result = flow
            .pay(|_draft| async { Ok::<_, String>(()) })
            .await;
        assert_eq!(result, Err(CheckoutError::IncompleteCardDetails));

        // blocked attempt loses nothing the shopper typed
        assert_eq!(flow.stage(), Stage::Payment);
        let payment = flow.payment();
        assert_eq!(payment.card.holder_name, "Sam Doe");
        assert_eq!(payment.card.expiry, "12/27");
        assert_eq!(payment.card.cvv, "123");
    }

    #[tokio::test]
    async fn test_pay_non_card_method_needs_no_card() {
        let mut flow = flow_at_payment();
        flow.payment_mut().unwrap().method = Some(PaymentMethod::CashOnDelivery);

        let order_id = flow
            .pay(|draft| async move {
                assert!(draft.card.is_none());
                Ok::<_, String>(9001_i64)
            })
            .await
            .unwrap();
        assert_eq!(order_id, 9001);
        assert_eq!(flow.stage(), Stage::Complete);
    }

    #[tokio::test]
    async fn test_pay_success_completes_and_clears_cart() {
        let mut flow = flow_at_payment();
        {
            let payment = flow.payment_mut().unwrap();
            payment.method = Some(PaymentMethod::CreditCard);
            payment.card = complete_card();
        }

        flow.pay(|draft| async move {
            assert_eq!(draft.totals.total.amount, Decimal::from(660));
            assert_eq!(draft.items.len(), 1);
            Ok::<_, String>(())
        })
        .await
        .unwrap();

        assert_eq!(flow.stage(), Stage::Complete);
        assert!(flow.cart().is_empty());
    }

    #[tokio::test]
    async fn test_pay_failure_stays_on_payment_with_data_intact() {
        let mut flow = flow_at_payment();
        {
            let payment = flow.payment_mut().unwrap();
            payment.method = Some(PaymentMethod::CreditCard);
            payment.card = complete_card();
        }

        let result = flow
            .pay(|_draft| async { Err::<(), _>("card declined".to_string()) })
            .await;
        assert_eq!(
            result,
            Err(CheckoutError::OrderRejected("card declined".to_string()))
        );

        assert_eq!(flow.stage(), Stage::Payment);
        assert!(!flow.cart().is_empty());
        assert_eq!(flow.payment().card, complete_card());
        assert_eq!(flow.delivery().address, Some(address()));
    }

    #[tokio::test]
    async fn test_complete_is_terminal() {
        let mut flow = flow_at_payment();
        flow.payment_mut().unwrap().method = Some(PaymentMethod::PayPal);
        flow.pay(|_draft| async { Ok::<_, String>(()) })
            .await
            .unwrap();

        assert_eq!(flow.stage(), Stage::Complete);
        assert_eq!(flow.back(), Err(CheckoutError::NoPreviousStage));
        assert!(flow.cart_mut().is_err());
        assert!(
            flow.pay(|_draft| async { Ok::<_, String>(()) })
                .await
                .is_err()
        );
    }
}
