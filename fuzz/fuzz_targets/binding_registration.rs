#![no_main]

use libfuzzer_sys::fuzz_target;
use bindery::{ContainerBuilder, Resolver, Scope};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct TestService {
    value: i32,
}

trait TestContract: Send + Sync {
    fn get_value(&self) -> i32;
}

impl TestContract for TestService {
    fn get_value(&self) -> i32 {
        self.value
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    let mut builder = ContainerBuilder::new();

    // Use first 4 bytes to determine the registration pattern
    let pattern = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);

    // Use next 4 bytes for service values
    let value = i32::from_le_bytes([data[4], data[5], data[6], data[7]]);

    match pattern % 6 {
        0 => {
            // Instance registration
            builder
                .bind::<TestService>()
                .to_instance(TestService { value })
                .register()
                .unwrap();

            let container = builder.build().unwrap();
            let service = container.get::<TestService>().unwrap();
            assert_eq!(service.value, value);
        }
        1 => {
            // Singleton provider
            builder
                .bind::<TestService>()
                .scoped(Scope::Singleton)
                .to_provider(move |_| Ok(Arc::new(TestService { value })))
                .register()
                .unwrap();

            let container = builder.build().unwrap();
            let a = container.get::<TestService>().unwrap();
            let b = container.get::<TestService>().unwrap();
            assert!(Arc::ptr_eq(&a, &b));
            assert_eq!(a.value, value);
        }
        2 => {
            // Application-scoped provider
            builder
                .bind::<TestService>()
                .scoped(Scope::Application)
                .to_provider(move |_| Ok(Arc::new(TestService { value })))
                .register()
                .unwrap();

            let container = builder.build().unwrap();
            let ctx = container.context("fuzz");
            let a = ctx.get::<TestService>().unwrap();
            let b = ctx.get::<TestService>().unwrap();
            assert!(Arc::ptr_eq(&a, &b));
            assert_eq!(a.value, value);
            // Resolving without a context is a scope error, not a panic.
            assert!(container.get::<TestService>().is_err());
        }
        3 => {
            // Prototype provider
            builder
                .bind::<TestService>()
                .to_provider(move |_| Ok(Arc::new(TestService { value })))
                .register()
                .unwrap();

            let container = builder.build().unwrap();
            let a = container.get::<TestService>().unwrap();
            let b = container.get::<TestService>().unwrap();
            assert!(!Arc::ptr_eq(&a, &b));
            assert_eq!(a.value, value);
            assert_eq!(b.value, value);
        }
        4 => {
            // Duplicate then override
            builder
                .bind::<TestService>()
                .to_instance(TestService { value: value.wrapping_div(2).wrapping_sub(1) })
                .register()
                .unwrap();
            assert!(builder
                .bind::<TestService>()
                .to_instance(TestService { value })
                .register()
                .is_err());
            builder
                .bind::<TestService>()
                .allow_override()
                .to_instance(TestService { value })
                .register()
                .unwrap();

            let container = builder.build().unwrap();
            assert_eq!(container.get::<TestService>().unwrap().value, value);
        }
        5 => {
            // Trait registration
            builder
                .bind_trait::<dyn TestContract>()
                .to_instance(Arc::new(TestService { value }))
                .register()
                .unwrap();

            let container = builder.build().unwrap();
            let contract = container.get_trait::<dyn TestContract>().unwrap();
            assert_eq!(contract.get_value(), value);
        }
        _ => unreachable!(),
    }
});
