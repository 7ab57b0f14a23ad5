//! Business logic services

pub mod assets;
pub mod resource;

use std::sync::Arc;

use crate::{
    models::{Accessory, Category, Mobile, Product, Service, User},
    repository::Repository,
};

use assets::AssetUploader;
use resource::{MustExist, ResourceService};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: Arc<ResourceService<User>>,
    pub mobiles: Arc<ResourceService<Mobile>>,
    pub accessories: Arc<ResourceService<Accessory>>,
    pub services: Arc<ResourceService<Service>>,
    pub categories: Arc<ResourceService<Category>>,
    pub products: Arc<ResourceService<Product>>,
}

impl Services {
    /// Create all services with the given repository and upload adapter
    pub fn new(repository: Repository, uploader: AssetUploader) -> Self {
        Self {
            users: Arc::new(ResourceService::new(repository.users).with_uploader(uploader.clone())),
            mobiles: Arc::new(ResourceService::new(repository.mobiles).with_uploader(uploader)),
            accessories: Arc::new(ResourceService::new(repository.accessories)),
            services: Arc::new(ResourceService::new(repository.services)),
            products: Arc::new(
                ResourceService::new(repository.products)
                    .with_reference(MustExist::new("category_id", repository.categories.clone())),
            ),
            categories: Arc::new(ResourceService::new(repository.categories)),
        }
    }
}
