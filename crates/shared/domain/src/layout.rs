use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Layouts a sub-plugin path accepts below `{plugin}/{path}/`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct PathLayout: u8 {
        /// `{basename}.py`
        const MODULE = 1 << 0;
        /// `{basename}/{basename}.py`
        const PACKAGE_USING_BASENAME = 1 << 1;
        /// `{basename}/__init__.py`
        const PACKAGE_USING_INIT = 1 << 2;
    }
}

impl PathLayout {
    #[must_use]
    pub fn from_flags(
        allow_module: bool,
        allow_package_using_basename: bool,
        allow_package_using_init: bool,
    ) -> Self {
        let mut layout = Self::empty();
        layout.set(Self::MODULE, allow_module);
        layout.set(Self::PACKAGE_USING_BASENAME, allow_package_using_basename);
        layout.set(Self::PACKAGE_USING_INIT, allow_package_using_init);
        layout
    }

    #[must_use]
    pub const fn allows_package(self) -> bool {
        self.intersects(Self::PACKAGE_USING_BASENAME.union(Self::PACKAGE_USING_INIT))
    }
}

impl Serialize for PathLayout {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for PathLayout {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_bits_truncate(u8::deserialize(deserializer)?))
    }
}

/// A directory inside a plugin that hosts sub-plugins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubPluginRoot {
    /// Relative to the plugin directory, without leading or trailing slash.
    pub path: String,
    pub layout: PathLayout,
}
