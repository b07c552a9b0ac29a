pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod infrastructure;
pub mod logging;
pub mod scopist;

// Re-export commonly used items for convenience
pub use config::ScopistConfig;
pub use errors::AppError;

/// 常用类型一次性导入
pub mod prelude {
    pub use crate::bootstrap::build_with_config;
    pub use crate::infrastructure::container::{
        Component, ContainerError, Dependency, EntryPoint, ProviderOptions, RegistrationCatalog,
        Resolver, ResolverExt, ServiceCollection, ServiceDescriptor, ServiceLifetime,
        ServiceProvider, ServiceScope, ServiceType,
    };
    pub use crate::infrastructure::{ResolveScoped, ScopedResolver};
    pub use crate::scopist::{
        validate, validate_now, ScopistChecker, ScopistExt, ScopistOptions, ScopistProviderExt,
        ScopistValidationError, ValidationError, ValidationOutcome,
    };
}
