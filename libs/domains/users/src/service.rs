//! Profile Service - business logic for profile, seller info and shipping addresses

use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::eligibility;
use crate::error::{UserError, UserResult};
use crate::models::{
    BuyEligibility, CreateShippingAddress, DeleteResult, Profile, ProfileAddress, ProfileView,
    SellEligibility, SellerInfo, ShippingAddress, UpdateBasicInfo, UpdateSellerInfo,
    UpdateShippingAddress, User,
};
use crate::repository::{ShippingAddressRepository, UserRepository};

const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";
const MUST_ACCEPT_AGREEMENTS: &str = "Must accept all agreements";

/// Trimmed, non-blank value or `None`
fn filled(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn missing_fields() -> UserError {
    UserError::Validation(MISSING_REQUIRED_FIELDS.to_string())
}

pub struct ProfileService<U: UserRepository, A: ShippingAddressRepository> {
    users: Arc<U>,
    addresses: Arc<A>,
}

impl<U: UserRepository, A: ShippingAddressRepository> ProfileService<U, A> {
    pub fn new(users: U, addresses: A) -> Self {
        Self {
            users: Arc::new(users),
            addresses: Arc::new(addresses),
        }
    }

    async fn require_user(&self, user_id: Uuid) -> UserResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: Uuid) -> UserResult<ProfileView> {
        let user = self.require_user(user_id).await?;
        let addresses = self.addresses.find_by_user_id(user_id).await?;
        let completion = eligibility::completion(&user, &addresses);

        Ok(ProfileView {
            profile: user.profile.unwrap_or_default(),
            shipping_addresses: addresses,
            seller_info: user.seller_info.unwrap_or_default(),
            completion,
        })
    }

    /// Overwrite the basic profile. Verified flags are preserved, avatar and
    /// street keep their previous values when omitted.
    #[instrument(skip(self, input))]
    pub async fn update_basic_info(
        &self,
        user_id: Uuid,
        input: UpdateBasicInfo,
    ) -> UserResult<Profile> {
        let user = self.require_user(user_id).await?;

        let address = input.address.unwrap_or_default();
        let full_name = filled(input.full_name).ok_or_else(missing_fields)?;
        let phone = filled(input.phone).ok_or_else(missing_fields)?;
        let province = filled(address.province).ok_or_else(missing_fields)?;
        let district = filled(address.district).ok_or_else(missing_fields)?;
        let ward = filled(address.ward).ok_or_else(missing_fields)?;

        let existing = user.profile.unwrap_or_default();
        let existing_street = existing.address.and_then(|a| a.street);

        let profile = Profile {
            full_name: Some(full_name),
            phone: Some(phone),
            phone_verified: existing.phone_verified,
            email_verified: existing.email_verified,
            avatar: filled(input.avatar).or(existing.avatar),
            address: Some(ProfileAddress {
                province: Some(province),
                district: Some(district),
                ward: Some(ward),
                street: filled(address.street).or(existing_street),
            }),
        };

        self.users
            .update_profile(user_id, profile.clone())
            .await?
            .ok_or(UserError::UserNotFound)?;

        tracing::info!(user_id = %user_id, "Profile basic info updated");
        Ok(profile)
    }

    #[instrument(skip(self, input))]
    pub async fn add_shipping_address(
        &self,
        user_id: Uuid,
        input: CreateShippingAddress,
    ) -> UserResult<ShippingAddress> {
        self.require_user(user_id).await?;

        let full_name = filled(input.full_name).ok_or_else(missing_fields)?;
        let phone = filled(input.phone).ok_or_else(missing_fields)?;
        let province = filled(input.province).ok_or_else(missing_fields)?;
        let district = filled(input.district).ok_or_else(missing_fields)?;
        let ward = filled(input.ward).ok_or_else(missing_fields)?;

        let existing = self.addresses.find_by_user_id(user_id).await?;
        let is_default = input.is_default.unwrap_or(existing.is_empty());
        let is_default_pickup = input.is_default_pickup.unwrap_or(false);

        if is_default {
            self.addresses.unset_default(user_id).await?;
        }
        if is_default_pickup {
            self.addresses.unset_default_pickup(user_id).await?;
        }

        let now = Utc::now();
        let address = ShippingAddress {
            id: Uuid::now_v7(),
            user_id,
            full_name,
            phone,
            province,
            district,
            ward,
            street: filled(input.street),
            note: filled(input.note),
            is_default,
            is_default_pickup,
            created_at: now,
            updated_at: now,
        };

        let created = self.addresses.create(address).await?;
        tracing::info!(user_id = %user_id, address_id = %created.id, "Shipping address added");
        Ok(created)
    }

    /// Partial update. Blank required fields are ignored, an empty street or
    /// note clears it.
    #[instrument(skip(self, input))]
    pub async fn update_shipping_address(
        &self,
        user_id: Uuid,
        address_id: Uuid,
        input: UpdateShippingAddress,
    ) -> UserResult<ShippingAddress> {
        self.require_user(user_id).await?;

        let mut address = self
            .addresses
            .find_by_id_and_user_id(address_id, user_id)
            .await?
            .ok_or(UserError::ShippingAddressNotFound)?;

        if let Some(full_name) = filled(input.full_name) {
            address.full_name = full_name;
        }
        if let Some(phone) = filled(input.phone) {
            address.phone = phone;
        }
        if let Some(province) = filled(input.province) {
            address.province = province;
        }
        if let Some(district) = filled(input.district) {
            address.district = district;
        }
        if let Some(ward) = filled(input.ward) {
            address.ward = ward;
        }
        if input.street.is_some() {
            address.street = filled(input.street);
        }
        if input.note.is_some() {
            address.note = filled(input.note);
        }

        if input.is_default == Some(true) {
            self.addresses.unset_default(user_id).await?;
            address.is_default = true;
        }
        if input.is_default_pickup == Some(true) {
            self.addresses.unset_default_pickup(user_id).await?;
            address.is_default_pickup = true;
        }

        address.updated_at = Utc::now();
        let updated = self.addresses.replace(address).await?;

        tracing::info!(user_id = %user_id, address_id = %address_id, "Shipping address updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_shipping_address(
        &self,
        user_id: Uuid,
        address_id: Uuid,
    ) -> UserResult<DeleteResult> {
        self.require_user(user_id).await?;

        if !self.addresses.delete(address_id, user_id).await? {
            return Err(UserError::ShippingAddressNotFound);
        }

        tracing::info!(user_id = %user_id, address_id = %address_id, "Shipping address deleted");
        Ok(DeleteResult { success: true })
    }

    /// Merge the patch into the stored seller info. Agreements, when sent,
    /// must both be accepted.
    #[instrument(skip(self, input))]
    pub async fn update_seller_info(
        &self,
        user_id: Uuid,
        input: UpdateSellerInfo,
    ) -> UserResult<SellerInfo> {
        let user = self.require_user(user_id).await?;

        if let Some(ref agreements) = input.agreements {
            if agreements.terms_accepted != Some(true) || agreements.no_prohibited_items != Some(true)
            {
                return Err(UserError::Validation(MUST_ACCEPT_AGREEMENTS.to_string()));
            }
        }

        let mut info = user.seller_info.unwrap_or_default();

        if let Some(shop_name) = input.shop_name {
            info.shop_name = Some(shop_name);
        }
        if let Some(trading_area) = input.trading_area {
            info.trading_area = Some(trading_area);
        }
        if let Some(contact) = input.contact_methods {
            let current = &mut info.contact_methods;
            current.internal_chat = contact.internal_chat.unwrap_or(current.internal_chat);
            current.phone = contact.phone.unwrap_or(current.phone);
            current.show_phone = contact.show_phone.unwrap_or(current.show_phone);
        }
        if let Some(payment) = input.payment_methods {
            let current = &mut info.payment_methods;
            current.e_wallet = payment.e_wallet.unwrap_or(current.e_wallet);
            current.bank_transfer = payment.bank_transfer.unwrap_or(current.bank_transfer);
            if payment.bank_account.is_some() {
                current.bank_account = payment.bank_account;
            }
        }
        if let Some(agreements) = input.agreements {
            let current = &mut info.agreements;
            current.terms_accepted = agreements.terms_accepted.unwrap_or(current.terms_accepted);
            current.no_prohibited_items = agreements
                .no_prohibited_items
                .unwrap_or(current.no_prohibited_items);
        }

        self.users
            .update_seller_info(user_id, info.clone())
            .await?
            .ok_or(UserError::UserNotFound)?;

        tracing::info!(user_id = %user_id, "Seller info updated");
        Ok(info)
    }

    #[instrument(skip(self))]
    pub async fn check_can_sell(&self, user_id: Uuid) -> UserResult<SellEligibility> {
        let user = self.require_user(user_id).await?;
        Ok(eligibility::can_sell(&user))
    }

    #[instrument(skip(self))]
    pub async fn check_can_buy(&self, user_id: Uuid) -> UserResult<BuyEligibility> {
        let user = self.require_user(user_id).await?;
        let addresses = self.addresses.find_by_user_id(user_id).await?;
        Ok(eligibility::can_buy(&user, &addresses))
    }
}
