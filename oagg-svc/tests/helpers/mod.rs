//! Scripted dependency ports for aggregator tests
//!
//! Each port answers with a fixed reply after an optional delay and counts
//! how often it was called and how often it ran to completion.

#![allow(dead_code)]

use async_trait::async_trait;
use oagg_common::models::{
    FilterCriteria, Format, Image, Offer, OfferCondition, Order, Product, SortCriteria,
};
use oagg_svc::{
    Aggregator, AggregatorConfig, ImageLookup, LookupError, OfferLookup, OrderLookup, Ports,
    ProductLookup,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SELLER_ID: i64 = 1;
pub const ORDER_ID: i64 = 2;
pub const OFFER_ID: i64 = 3;
pub const PRODUCT_ID: i64 = 4;
pub const TITLE: &str = "Title";

pub fn order() -> Order {
    Order::new(ORDER_ID, OFFER_ID, PRODUCT_ID)
}

pub fn offer() -> Offer {
    Offer::new(OFFER_ID, OfferCondition::AsNew)
}

pub fn product() -> Product {
    Product::new(PRODUCT_ID, TITLE)
}

pub fn image() -> Image {
    Image::new(TITLE, Format::Gif, 1)
}

/// What a scripted port answers
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Value(T),
    /// Explicit "no data" (an empty list for images)
    Null,
    Fail(&'static str),
    Panic,
}

pub struct Scripted<T> {
    reply: Reply<T>,
    delay: Duration,
    calls: AtomicUsize,
    completed: AtomicUsize,
    seen_keys: Mutex<Vec<i64>>,
    seen_sort: Mutex<Vec<SortCriteria>>,
}

impl<T: Clone + Send + Sync> Scripted<T> {
    pub fn new(reply: Reply<T>) -> Arc<Self> {
        Self::delayed(reply, Duration::ZERO)
    }

    pub fn delayed(reply: Reply<T>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply,
            delay,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            seen_keys: Mutex::new(Vec::new()),
            seen_sort: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls that got past the delay
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn seen_keys(&self) -> Vec<i64> {
        self.seen_keys.lock().unwrap().clone()
    }

    pub fn seen_sort(&self) -> Vec<SortCriteria> {
        self.seen_sort.lock().unwrap().clone()
    }

    async fn respond(&self, key: i64) -> Result<Option<T>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_keys.lock().unwrap().push(key);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        match &self.reply {
            Reply::Value(value) => Ok(Some(value.clone())),
            Reply::Null => Ok(None),
            Reply::Fail(message) => Err(LookupError::Other(message.to_string())),
            Reply::Panic => panic!("scripted panic"),
        }
    }
}

#[async_trait]
impl OrderLookup for Scripted<Order> {
    async fn fetch_order(&self, seller_id: i64) -> Result<Option<Order>, LookupError> {
        self.respond(seller_id).await
    }
}

#[async_trait]
impl OfferLookup for Scripted<Offer> {
    async fn fetch_offer(&self, offer_id: i64) -> Result<Option<Offer>, LookupError> {
        self.respond(offer_id).await
    }
}

#[async_trait]
impl ProductLookup for Scripted<Product> {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, LookupError> {
        self.respond(product_id).await
    }
}

#[async_trait]
impl ImageLookup for Scripted<Vec<Image>> {
    async fn fetch_images(
        &self,
        sort: &SortCriteria,
        filter: &FilterCriteria,
    ) -> Result<Vec<Image>, LookupError> {
        self.seen_sort.lock().unwrap().push(*sort);
        Ok(self.respond(filter.product_id).await?.unwrap_or_default())
    }
}

/// Four scripted ports, all succeeding immediately by default
pub struct Fixture {
    pub orders: Arc<Scripted<Order>>,
    pub offers: Arc<Scripted<Offer>>,
    pub products: Arc<Scripted<Product>>,
    pub images: Arc<Scripted<Vec<Image>>>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            orders: Scripted::new(Reply::Value(order())),
            offers: Scripted::new(Reply::Value(offer())),
            products: Scripted::new(Reply::Value(product())),
            images: Scripted::new(Reply::Value(vec![image()])),
        }
    }
}

impl Fixture {
    pub fn ports(&self) -> Ports {
        Ports::new(
            self.orders.clone(),
            self.offers.clone(),
            self.products.clone(),
            self.images.clone(),
        )
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(self.ports(), AggregatorConfig::default())
    }

    pub fn aggregator_with(&self, branch_budget: Duration, cancel_on_timeout: bool) -> Aggregator {
        Aggregator::new(
            self.ports(),
            AggregatorConfig {
                branch_budget,
                cancel_on_timeout,
            },
        )
    }

    /// Calls made to the three enrichment ports
    pub fn branch_calls(&self) -> usize {
        self.offers.calls() + self.products.calls() + self.images.calls()
    }
}
