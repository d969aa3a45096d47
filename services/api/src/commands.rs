use clap::Args;
use kalyani_estate::auth::TokenService;
use kalyani_estate::client::{
    redirect_path, FormError, FormEvent, HomeFeed, HomePage, InputKind, ListingApiClient,
    ListingDraft, ListingForm,
};
use kalyani_estate::config::AppConfig;
use kalyani_estate::error::AppError;
use kalyani_estate::listings::{ListingType, UserId};
use kalyani_estate::storage::{FirebaseStorage, ImageFile};
use kalyani_estate::telemetry;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct HomeArgs {
    /// Listing API base URL (defaults to ESTATE_API_URL)
    #[arg(long)]
    pub(crate) api_url: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct CreateArgs {
    /// JSON file describing the listing details
    #[arg(long)]
    pub(crate) manifest: PathBuf,
    /// Image to upload; repeat for up to six images
    #[arg(long = "image")]
    pub(crate) images: Vec<PathBuf>,
    /// Owner of the new listing
    #[arg(long)]
    pub(crate) user: String,
    /// Access token to send; a development token is issued when omitted
    #[arg(long)]
    pub(crate) token: Option<String>,
    /// Firebase ID token for the storage bucket
    #[arg(long)]
    pub(crate) storage_token: Option<String>,
    /// Listing API base URL (defaults to ESTATE_API_URL)
    #[arg(long)]
    pub(crate) api_url: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct TokenArgs {
    /// User id to place in the token subject
    #[arg(long)]
    pub(crate) user: String,
}

/// Listing details read by `create`; omitted fields keep the form defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ListingManifest {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) address: String,
    #[serde(rename = "type")]
    pub(crate) listing_type: ListingType,
    pub(crate) bedrooms: u32,
    pub(crate) bathrooms: u32,
    pub(crate) regular_price: u64,
    pub(crate) discount_price: u64,
    pub(crate) offer: bool,
    pub(crate) parking: bool,
    pub(crate) furnished: bool,
}

impl Default for ListingManifest {
    fn default() -> Self {
        let draft = ListingDraft::default();
        Self {
            name: draft.name,
            description: draft.description,
            address: draft.address,
            listing_type: draft.listing_type,
            bedrooms: draft.bedrooms,
            bathrooms: draft.bathrooms,
            regular_price: draft.regular_price,
            discount_price: draft.discount_price,
            offer: draft.offer,
            parking: draft.parking,
            furnished: draft.furnished,
        }
    }
}

impl ListingManifest {
    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let manifest = serde_json::from_str(&raw).map_err(std::io::Error::from)?;
        Ok(manifest)
    }

    /// The control events a user would raise filling in the form.
    pub(crate) fn events(&self) -> Vec<FormEvent> {
        vec![
            FormEvent::text("name", &self.name),
            FormEvent::Input {
                id: "description".to_string(),
                kind: InputKind::TextArea,
                value: self.description.clone(),
            },
            FormEvent::text("address", &self.address),
            FormEvent::toggle(self.listing_type.label(), true),
            FormEvent::toggle("parking", self.parking),
            FormEvent::toggle("furnished", self.furnished),
            FormEvent::toggle("offer", self.offer),
            FormEvent::number("bedrooms", &self.bedrooms.to_string()),
            FormEvent::number("bathrooms", &self.bathrooms.to_string()),
            FormEvent::number("regularPrice", &self.regular_price.to_string()),
            FormEvent::number("discountPrice", &self.discount_price.to_string()),
        ]
    }

    pub(crate) fn fill(&self, form: &mut ListingForm) -> Result<(), FormError> {
        for event in self.events() {
            form.apply(event)?;
        }
        Ok(())
    }
}

pub(crate) async fn run_home(args: HomeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let api_url = args.api_url.unwrap_or(config.client.api_url);
    let client = ListingApiClient::new(reqwest::Client::new(), api_url);

    let feed = HomeFeed::load(&client).await;
    print!("{}", HomePage::from_feed(&feed).render_text());
    Ok(())
}

pub(crate) async fn run_create(args: CreateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let owner = UserId(args.user);
    let token = match args.token {
        Some(token) => token,
        None => TokenService::from_config(&config.auth).issue(&owner)?,
    };
    let http = reqwest::Client::new();
    let api_url = args.api_url.unwrap_or(config.client.api_url);
    let api = ListingApiClient::new(http.clone(), api_url).with_token(token);
    let mut storage = FirebaseStorage::from_config(http, &config.storage);
    if let Some(storage_token) = args.storage_token {
        storage = storage.with_auth_token(storage_token);
    }

    let mut form = ListingForm::new();
    ListingManifest::load(&args.manifest)?.fill(&mut form)?;

    let files = args
        .images
        .iter()
        .map(|path| ImageFile::read(path))
        .collect::<Result<Vec<_>, _>>()?;
    form.select_files(files);
    let uploaded = form.upload_images(&storage).await?;
    info!(uploaded, "listing images uploaded");

    let listing = form.submit(&api, &owner).await?;
    println!("{}", redirect_path(&listing));
    Ok(())
}

pub(crate) fn run_token(args: TokenArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let token = TokenService::from_config(&config.auth).issue(&UserId(args.user))?;
    println!("{token}");
    Ok(())
}
