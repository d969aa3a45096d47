//! Controller behind the "Create a Listing" form.
//!
//! The form keeps one flat draft in sync with user input, uploads picked
//! images in a single all-or-nothing batch, and posts the finished draft once.

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::api::{ClientError, ListingApiClient};
use crate::listings::validation::{self, ValidationError, MAX_IMAGES};
use crate::listings::{Listing, ListingType, NewListing, UserId};
use crate::storage::{ImageFile, ImageStore, StorageError};

pub const UPLOAD_LIMIT_MESSAGE: &str = "You can only upload 6 images per listing";
pub const UPLOAD_FAILED_MESSAGE: &str = "Image upload failed (2 mb max per image)";

/// Client-side state of a listing that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    pub name: String,
    pub description: String,
    pub address: String,
    pub listing_type: ListingType,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub regular_price: u64,
    pub discount_price: u64,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
    pub image_urls: Vec<String>,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            address: String::new(),
            listing_type: ListingType::Rent,
            bedrooms: 1,
            bathrooms: 1,
            regular_price: 50,
            discount_price: 0,
            offer: false,
            parking: false,
            furnished: false,
            image_urls: Vec::new(),
        }
    }
}

impl ListingDraft {
    pub fn to_new_listing(&self, owner: &UserId) -> NewListing {
        NewListing {
            name: self.name.clone(),
            description: self.description.clone(),
            address: self.address.clone(),
            listing_type: self.listing_type,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            regular_price: self.regular_price,
            discount_price: self.discount_price,
            offer: self.offer,
            parking: self.parking,
            furnished: self.furnished,
            image_urls: self.image_urls.clone(),
            user_ref: owner.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    TextArea,
    Number,
}

/// A change event raised by one of the form's controls, keyed by control id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Toggle {
        id: String,
        checked: bool,
    },
    Input {
        id: String,
        kind: InputKind,
        value: String,
    },
}

impl FormEvent {
    pub fn toggle(id: &str, checked: bool) -> Self {
        Self::Toggle {
            id: id.to_string(),
            checked,
        }
    }

    pub fn text(id: &str, value: &str) -> Self {
        Self::Input {
            id: id.to_string(),
            kind: InputKind::Text,
            value: value.to_string(),
        }
    }

    pub fn number(id: &str, value: &str) -> Self {
        Self::Input {
            id: id.to_string(),
            kind: InputKind::Number,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("unknown form control '{0}'")]
    UnknownControl(String),
    #[error("control '{id}' does not accept {kind:?} input")]
    KindMismatch { id: String, kind: InputKind },
    #[error("'{value}' is not a valid number for {id}")]
    InvalidNumber { id: String, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("You can only upload 6 images per listing")]
    ImageLimit,
    #[error("Image upload failed (2 mb max per image)")]
    Upload(#[source] StorageError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Listing-creation form state: the draft plus upload/submit progress.
#[derive(Debug, Default)]
pub struct ListingForm {
    draft: ListingDraft,
    files: Vec<ImageFile>,
    uploading: bool,
    image_upload_error: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl ListingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn selected_files(&self) -> &[ImageFile] {
        &self.files
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn image_upload_error(&self) -> Option<&str> {
        self.image_upload_error.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.uploading
    }

    /// Mirror one control change into the draft.
    pub fn apply(&mut self, event: FormEvent) -> Result<(), FieldError> {
        match event {
            FormEvent::Toggle { id, checked } => self.apply_toggle(&id, checked),
            FormEvent::Input { id, kind, value } => self.apply_input(&id, kind, value),
        }
    }

    fn apply_toggle(&mut self, id: &str, checked: bool) -> Result<(), FieldError> {
        match id {
            // Sale and rent behave like radio buttons: picking one selects it.
            "sale" => self.draft.listing_type = ListingType::Sale,
            "rent" => self.draft.listing_type = ListingType::Rent,
            "parking" => self.draft.parking = checked,
            "furnished" => self.draft.furnished = checked,
            "offer" => self.draft.offer = checked,
            other => return Err(FieldError::UnknownControl(other.to_string())),
        }
        Ok(())
    }

    fn apply_input(&mut self, id: &str, kind: InputKind, value: String) -> Result<(), FieldError> {
        let text_kind = matches!(kind, InputKind::Text | InputKind::TextArea);
        match id {
            "name" | "description" | "address" if !text_kind => Err(FieldError::KindMismatch {
                id: id.to_string(),
                kind,
            }),
            "name" => {
                self.draft.name = value;
                Ok(())
            }
            "description" => {
                self.draft.description = value;
                Ok(())
            }
            "address" => {
                self.draft.address = value;
                Ok(())
            }
            "bedrooms" | "bathrooms" | "regularPrice" | "discountPrice"
                if kind != InputKind::Number =>
            {
                Err(FieldError::KindMismatch {
                    id: id.to_string(),
                    kind,
                })
            }
            "bedrooms" => {
                self.draft.bedrooms = parse_number(id, &value)?;
                Ok(())
            }
            "bathrooms" => {
                self.draft.bathrooms = parse_number(id, &value)?;
                Ok(())
            }
            "regularPrice" => {
                self.draft.regular_price = parse_number(id, &value)?;
                Ok(())
            }
            "discountPrice" => {
                self.draft.discount_price = parse_number(id, &value)?;
                Ok(())
            }
            other => Err(FieldError::UnknownControl(other.to_string())),
        }
    }

    /// Replace the current file selection.
    pub fn select_files(&mut self, files: Vec<ImageFile>) {
        self.files = files;
    }

    /// Upload the selected files as one batch.
    ///
    /// URLs are appended in selection order only when every upload succeeds;
    /// a single failure leaves the draft's images untouched.
    pub async fn upload_images<S>(&mut self, store: &S) -> Result<usize, FormError>
    where
        S: ImageStore + ?Sized,
    {
        if self.files.is_empty() || self.files.len() + self.draft.image_urls.len() > MAX_IMAGES {
            self.image_upload_error = Some(UPLOAD_LIMIT_MESSAGE.to_string());
            return Err(FormError::ImageLimit);
        }

        self.image_upload_error = None;

        let in_flight = InFlight::raise(&mut self.uploading);
        let result = try_join_all(self.files.iter().map(|file| store.upload(file))).await;
        drop(in_flight);

        match result {
            Ok(urls) => {
                let uploaded = urls.len();
                debug!(uploaded, "image batch uploaded");
                self.draft.image_urls.extend(urls);
                self.files.clear();
                Ok(uploaded)
            }
            Err(err) => {
                warn!(error = %err, "image batch upload failed");
                self.image_upload_error = Some(UPLOAD_FAILED_MESSAGE.to_string());
                Err(FormError::Upload(err))
            }
        }
    }

    /// Drop one uploaded image; the remaining order is preserved.
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        if index < self.draft.image_urls.len() {
            Some(self.draft.image_urls.remove(index))
        } else {
            None
        }
    }

    /// Validate the draft and create the listing with a single request.
    pub async fn submit(
        &mut self,
        api: &ListingApiClient,
        owner: &UserId,
    ) -> Result<Listing, FormError> {
        let listing = self.draft.to_new_listing(owner);
        if let Err(violation) = validation::validate(&listing) {
            self.error = Some(violation.to_string());
            return Err(violation.into());
        }

        self.error = None;
        let in_flight = InFlight::raise(&mut self.loading);
        let result = api.create_listing(&listing).await;
        drop(in_flight);

        match result {
            Ok(created) => {
                info!(listing = %created.id, "listing submitted");
                Ok(created)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }
}

/// Holds a progress flag up for the lifetime of a request, lowering it when
/// the request finishes or its future is dropped.
struct InFlight<'a> {
    flag: &'a mut bool,
}

impl<'a> InFlight<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

/// Page the client navigates to after a successful create.
pub fn redirect_path(listing: &Listing) -> String {
    format!("/listing/{}", listing.id)
}

fn parse_number<T: std::str::FromStr>(id: &str, value: &str) -> Result<T, FieldError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| FieldError::InvalidNumber {
            id: id.to_string(),
            value: value.to_string(),
        })
}
