// SVG2Icon - core/catalog.rs
//
// Static size tables per target platform. Names and sizes are relied upon by
// downstream tooling (Xcode asset catalogs, Android mipmap folders, PWA
// manifests) and must not change.

use crate::core::model::{IconSizeSpec, TargetPlatform};

const UNIVERSAL: &[IconSizeSpec] = &[
    IconSizeSpec::px("icon-16", 16),
    IconSizeSpec::px("icon-24", 24),
    IconSizeSpec::px("icon-32", 32),
    IconSizeSpec::px("icon-48", 48),
    IconSizeSpec::px("icon-64", 64),
    IconSizeSpec::px("icon-72", 72),
    IconSizeSpec::px("icon-96", 96),
    IconSizeSpec::px("icon-120", 120),
    IconSizeSpec::px("icon-128", 128),
    IconSizeSpec::px("icon-144", 144),
    IconSizeSpec::px("icon-152", 152),
    IconSizeSpec::px("icon-180", 180),
    IconSizeSpec::px("icon-192", 192),
    IconSizeSpec::px("icon-256", 256),
    IconSizeSpec::px("icon-512", 512),
    IconSizeSpec::px("icon-1024", 1024),
];

const IOS: &[IconSizeSpec] = &[
    IconSizeSpec::scaled("icon-20@1x", 20, 1.0),
    IconSizeSpec::scaled("icon-20@2x", 40, 2.0),
    IconSizeSpec::scaled("icon-20@3x", 60, 3.0),
    IconSizeSpec::scaled("icon-29@1x", 29, 1.0),
    IconSizeSpec::scaled("icon-29@2x", 58, 2.0),
    IconSizeSpec::scaled("icon-29@3x", 87, 3.0),
    IconSizeSpec::scaled("icon-40@1x", 40, 1.0),
    IconSizeSpec::scaled("icon-40@2x", 80, 2.0),
    IconSizeSpec::scaled("icon-40@3x", 120, 3.0),
    IconSizeSpec::scaled("icon-60@2x", 120, 2.0),
    IconSizeSpec::scaled("icon-60@3x", 180, 3.0),
    IconSizeSpec::scaled("icon-76@1x", 76, 1.0),
    IconSizeSpec::scaled("icon-76@2x", 152, 2.0),
    IconSizeSpec::scaled("icon-83.5@2x", 167, 2.0),
    IconSizeSpec::scaled("icon-1024@1x", 1024, 1.0),
];

const ANDROID: &[IconSizeSpec] = &[
    IconSizeSpec::px("mipmap-ldpi/ic_launcher", 36),
    IconSizeSpec::px("mipmap-mdpi/ic_launcher", 48),
    IconSizeSpec::px("mipmap-hdpi/ic_launcher", 72),
    IconSizeSpec::px("mipmap-xhdpi/ic_launcher", 96),
    IconSizeSpec::px("mipmap-xxhdpi/ic_launcher", 144),
    IconSizeSpec::px("mipmap-xxxhdpi/ic_launcher", 192),
    IconSizeSpec::px("playstore-icon", 512),
];

// Shared by desktop and electron.
const DESKTOP: &[IconSizeSpec] = &[
    IconSizeSpec::px("icon-16", 16),
    IconSizeSpec::px("icon-24", 24),
    IconSizeSpec::px("icon-32", 32),
    IconSizeSpec::px("icon-48", 48),
    IconSizeSpec::px("icon-64", 64),
    IconSizeSpec::px("icon-96", 96),
    IconSizeSpec::px("icon-128", 128),
    IconSizeSpec::px("icon-256", 256),
    IconSizeSpec::px("icon-512", 512),
    IconSizeSpec::px("icon-1024", 1024),
];

const WEB: &[IconSizeSpec] = &[
    IconSizeSpec::px("favicon-16", 16),
    IconSizeSpec::px("favicon-32", 32),
    IconSizeSpec::px("apple-touch-icon-57", 57),
    IconSizeSpec::px("apple-touch-icon-60", 60),
    IconSizeSpec::px("apple-touch-icon-72", 72),
    IconSizeSpec::px("apple-touch-icon-76", 76),
    IconSizeSpec::px("apple-touch-icon-114", 114),
    IconSizeSpec::px("apple-touch-icon-120", 120),
    IconSizeSpec::px("apple-touch-icon-144", 144),
    IconSizeSpec::px("apple-touch-icon-152", 152),
    IconSizeSpec::px("apple-touch-icon-180", 180),
    IconSizeSpec::px("manifest-192", 192),
    IconSizeSpec::px("manifest-512", 512),
];

/// Ordered size list for a target. Order only affects log order.
pub fn icon_sizes(target: TargetPlatform) -> &'static [IconSizeSpec] {
    match target {
        TargetPlatform::Universal => UNIVERSAL,
        TargetPlatform::Ios => IOS,
        TargetPlatform::Android => ANDROID,
        TargetPlatform::Desktop | TargetPlatform::Electron => DESKTOP,
        TargetPlatform::Web => WEB,
    }
}
