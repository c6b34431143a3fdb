//! Read-time profile derivations: completion score and buy/sell eligibility.
//!
//! Nothing here is stored. Labels are the Vietnamese strings shown in the UI.

use crate::models::{
    BuyEligibility, Completion, Profile, SellEligibility, SellerInfo, ShippingAddress, User,
};

pub const PROFILE_INCOMPLETE: &str = "PROFILE_INCOMPLETE";

pub const LABEL_FULL_NAME: &str = "Họ và tên";
pub const LABEL_PHONE: &str = "Số điện thoại";
pub const LABEL_PROVINCE: &str = "Tỉnh/Thành phố";
pub const LABEL_DISTRICT: &str = "Quận/Huyện";
pub const LABEL_WARD: &str = "Phường/Xã";
pub const LABEL_AVATAR: &str = "Ảnh đại diện";
pub const LABEL_DEFAULT_ADDRESS: &str = "Địa chỉ giao hàng mặc định";

pub const MISSING_BASIC_PROFILE: &str = "Thông tin cá nhân chưa hoàn thiện";
pub const MISSING_SELLER_INFO: &str = "Thông tin người bán chưa hoàn thiện";
pub const MISSING_DEFAULT_ADDRESS: &str = "Chưa có địa chỉ giao hàng mặc định";

const COMPLETION_FACETS: u32 = 7;

fn present(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Full name, phone, province, district and ward are all filled in.
pub fn is_basic_profile_complete(profile: Option<&Profile>) -> bool {
    let Some(profile) = profile else {
        return false;
    };
    let address = profile.address.as_ref();

    present(profile.full_name.as_ref())
        && present(profile.phone.as_ref())
        && present(address.and_then(|a| a.province.as_ref()))
        && present(address.and_then(|a| a.district.as_ref()))
        && present(address.and_then(|a| a.ward.as_ref()))
}

/// Shop name, trading area and both agreements accepted.
pub fn is_seller_info_complete(seller_info: Option<&SellerInfo>) -> bool {
    seller_info.is_some_and(|info| {
        present(info.shop_name.as_ref())
            && present(info.trading_area.as_ref())
            && info.agreements.terms_accepted
            && info.agreements.no_prohibited_items
    })
}

pub fn has_default_shipping_address(addresses: &[ShippingAddress]) -> bool {
    addresses.iter().any(|a| a.is_default)
}

/// Score seven facets and list the missing ones in display order.
pub fn completion(user: &User, addresses: &[ShippingAddress]) -> Completion {
    let profile = user.profile.as_ref();
    let address = profile.and_then(|p| p.address.as_ref());

    let facets = [
        (present(profile.and_then(|p| p.full_name.as_ref())), LABEL_FULL_NAME),
        (present(profile.and_then(|p| p.phone.as_ref())), LABEL_PHONE),
        (present(address.and_then(|a| a.province.as_ref())), LABEL_PROVINCE),
        (present(address.and_then(|a| a.district.as_ref())), LABEL_DISTRICT),
        (present(address.and_then(|a| a.ward.as_ref())), LABEL_WARD),
        (present(profile.and_then(|p| p.avatar.as_ref())), LABEL_AVATAR),
        (has_default_shipping_address(addresses), LABEL_DEFAULT_ADDRESS),
    ];

    let completed = facets.iter().filter(|(done, _)| *done).count() as u32;
    let missing_fields = facets
        .iter()
        .filter(|(done, _)| !*done)
        .map(|(_, label)| label.to_string())
        .collect();

    let percentage = ((completed * 100) as f64 / COMPLETION_FACETS as f64).round() as u8;

    Completion {
        percentage,
        missing_fields,
    }
}

fn incomplete(label: &str) -> (Option<String>, Option<Vec<String>>) {
    (
        Some(PROFILE_INCOMPLETE.to_string()),
        Some(vec![label.to_string()]),
    )
}

pub fn can_sell(user: &User) -> SellEligibility {
    let failure = if !is_basic_profile_complete(user.profile.as_ref()) {
        Some(incomplete(MISSING_BASIC_PROFILE))
    } else if !is_seller_info_complete(user.seller_info.as_ref()) {
        Some(incomplete(MISSING_SELLER_INFO))
    } else {
        None
    };

    match failure {
        Some((reason, missing_fields)) => SellEligibility {
            can_sell: false,
            reason,
            missing_fields,
        },
        None => SellEligibility {
            can_sell: true,
            reason: None,
            missing_fields: None,
        },
    }
}

pub fn can_buy(user: &User, addresses: &[ShippingAddress]) -> BuyEligibility {
    let failure = if !is_basic_profile_complete(user.profile.as_ref()) {
        Some(incomplete(MISSING_BASIC_PROFILE))
    } else if !has_default_shipping_address(addresses) {
        Some(incomplete(MISSING_DEFAULT_ADDRESS))
    } else {
        None
    };

    match failure {
        Some((reason, missing_fields)) => BuyEligibility {
            can_buy: false,
            reason,
            missing_fields,
        },
        None => BuyEligibility {
            can_buy: true,
            reason: None,
            missing_fields: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Agreements, ProfileAddress};
    use axum_helpers::Role;
    use chrono::Utc;
    use uuid::Uuid;

    fn complete_profile() -> Profile {
        Profile {
            full_name: Some("Nguyen Van A".to_string()),
            phone: Some("0900000000".to_string()),
            address: Some(ProfileAddress {
                province: Some("Ha Noi".to_string()),
                district: Some("Ba Dinh".to_string()),
                ward: Some("Kim Ma".to_string()),
                street: None,
            }),
            ..Profile::default()
        }
    }

    fn complete_seller_info() -> SellerInfo {
        SellerInfo {
            shop_name: Some("Tiem Do Cu".to_string()),
            trading_area: Some("Ha Noi".to_string()),
            agreements: Agreements {
                terms_accepted: true,
                no_prohibited_items: true,
            },
            ..SellerInfo::default()
        }
    }

    fn default_address(user_id: Uuid) -> ShippingAddress {
        let now = Utc::now();
        ShippingAddress {
            id: Uuid::now_v7(),
            user_id,
            full_name: "Nguyen Van A".to_string(),
            phone: "0900000000".to_string(),
            province: "Ha Noi".to_string(),
            district: "Ba Dinh".to_string(),
            ward: "Kim Ma".to_string(),
            street: None,
            note: None,
            is_default: true,
            is_default_pickup: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_completion_empty_profile() {
        let user = User::new("a@example.com", Role::User);
        let result = completion(&user, &[]);

        assert_eq!(result.percentage, 0);
        assert_eq!(result.missing_fields.len(), 7);
        assert_eq!(result.missing_fields[0], LABEL_FULL_NAME);
        assert_eq!(result.missing_fields[6], LABEL_DEFAULT_ADDRESS);
    }

    #[test]
    fn test_completion_rounds() {
        let mut user = User::new("a@example.com", Role::User);
        user.profile = Some(complete_profile());

        // 5 of 7 facets
        let result = completion(&user, &[]);
        assert_eq!(result.percentage, 71);
        assert_eq!(
            result.missing_fields,
            vec![LABEL_AVATAR.to_string(), LABEL_DEFAULT_ADDRESS.to_string()]
        );

        let addresses = [default_address(user.id)];
        user.profile.as_mut().unwrap().avatar = Some("https://cdn/avatar.png".to_string());
        let result = completion(&user, &addresses);
        assert_eq!(result.percentage, 100);
        assert!(result.missing_fields.is_empty());
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let mut profile = complete_profile();
        profile.full_name = Some("   ".to_string());
        assert!(!is_basic_profile_complete(Some(&profile)));
    }

    #[test]
    fn test_can_sell_requires_basic_profile_first() {
        let mut user = User::new("a@example.com", Role::User);
        user.seller_info = Some(complete_seller_info());

        let result = can_sell(&user);
        assert!(!result.can_sell);
        assert_eq!(result.reason.as_deref(), Some(PROFILE_INCOMPLETE));
        assert_eq!(result.missing_fields, Some(vec![MISSING_BASIC_PROFILE.to_string()]));
    }

    #[test]
    fn test_can_sell_false_when_terms_not_accepted() {
        let mut user = User::new("a@example.com", Role::User);
        user.profile = Some(complete_profile());
        let mut info = complete_seller_info();
        info.agreements.terms_accepted = false;
        user.seller_info = Some(info);

        let result = can_sell(&user);
        assert!(!result.can_sell);
        assert_eq!(result.reason.as_deref(), Some(PROFILE_INCOMPLETE));
        assert_eq!(result.missing_fields, Some(vec![MISSING_SELLER_INFO.to_string()]));
    }

    #[test]
    fn test_can_sell_true() {
        let mut user = User::new("a@example.com", Role::User);
        user.profile = Some(complete_profile());
        user.seller_info = Some(complete_seller_info());

        let result = can_sell(&user);
        assert!(result.can_sell);
        assert!(result.reason.is_none());
        assert!(result.missing_fields.is_none());
    }

    #[test]
    fn test_can_buy_needs_default_address() {
        let mut user = User::new("a@example.com", Role::User);
        user.profile = Some(complete_profile());

        let result = can_buy(&user, &[]);
        assert!(!result.can_buy);
        assert_eq!(result.missing_fields, Some(vec![MISSING_DEFAULT_ADDRESS.to_string()]));

        let mut non_default = default_address(user.id);
        non_default.is_default = false;
        assert!(!can_buy(&user, &[non_default]).can_buy);

        assert!(can_buy(&user, &[default_address(user.id)]).can_buy);
    }
}
