//! Property-based tests for channel assignment and value scaling.

use joymidi::controller::{DeviceId, DeviceInfo, HatDirection, InputEvent};
use joymidi::mapping::scaling::{control_value_from_axis, pitch_bend_from_axis};
use joymidi::mapping::{ChannelRegistry, EventMapper};
use joymidi::midi::MidiMessage;
use proptest::prelude::*;
use std::collections::BTreeSet;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Distinct identities get channels 0, 1, 2, ... in arrival order.
    #[test]
    fn prop_channels_are_contiguous(ids in prop::collection::btree_set(0usize..10_000, 1..40)) {
        let mut ids: Vec<usize> = ids.into_iter().collect();
        // arrival order need not be sorted
        ids.reverse();
        let mut registry = ChannelRegistry::new();
        for (expected, id) in ids.iter().enumerate() {
            let event = InputEvent::DeviceAdded {
                device: DeviceId(*id),
                info: DeviceInfo::new("pad", 2),
            };
            EventMapper.map(&event, &mut registry).unwrap();
            prop_assert_eq!(registry.channel(DeviceId(*id)).unwrap(), expected as u32);
        }
    }

    /// Removals never lower the channel handed to the next new identity.
    #[test]
    fn prop_removal_never_lowers_next_channel(
        count in 1usize..20,
        removals in prop::collection::vec(any::<prop::sample::Index>(), 0..20),
    ) {
        let mut registry = ChannelRegistry::new();
        for id in 0..count {
            registry.register_handle(DeviceId(id), DeviceInfo::new("pad", 1));
            registry.ensure_channel(DeviceId(id));
        }

        let mut removed = BTreeSet::new();
        for index in removals {
            let id = index.index(count);
            let before = registry.next_channel();
            let result = registry.retire(DeviceId(id));
            prop_assert_eq!(result.is_ok(), removed.insert(id));
            prop_assert_eq!(registry.next_channel(), before);
        }
        prop_assert_eq!(registry.next_channel(), count as u32);
    }

    /// Pitch bend stays inside the signed 14-bit range and always encodes.
    #[test]
    fn prop_pitch_bend_in_range(value in -1.0f32..=1.0f32) {
        let bend = pitch_bend_from_axis(value);
        prop_assert!((-8192..=8191).contains(&bend));
        let message = MidiMessage::PitchBend { channel: 0, value: bend };
        prop_assert!(message.to_bytes().is_ok());
    }

    /// Controller values are symmetric in the axis direction and 7-bit.
    #[test]
    fn prop_control_value_symmetric(value in 0.0f32..=1.0f32) {
        let positive = control_value_from_axis(value);
        prop_assert_eq!(positive, control_value_from_axis(-value));
        prop_assert!(positive <= 127);
    }

    /// The controller value is the floor of the exact product with 127.
    #[test]
    fn prop_control_value_is_exact_floor(value in -1.0f32..=1.0f32) {
        let exact = f64::from(value.abs()) * 127.0;
        let got = f64::from(control_value_from_axis(value));
        prop_assert!(got <= exact && exact < got + 1.0);
    }

    /// Every hat direction yields two controls with values 0 or 127.
    #[test]
    fn prop_hat_values_are_binary(x in -1i8..=1, y in -1i8..=1, axes in 1u32..8, hat in 0u8..4) {
        let device = DeviceId(0);
        let mut registry = ChannelRegistry::new();
        EventMapper.map(&InputEvent::DeviceAdded {
            device,
            info: DeviceInfo::new("pad", axes),
        }, &mut registry).unwrap();

        let out = EventMapper.map(&InputEvent::HatMotion {
            device,
            hat,
            direction: HatDirection::new(x, y),
        }, &mut registry).unwrap();

        prop_assert_eq!(out.len(), 2);
        let base = axes as i32 - 1 + i32::from(hat) * 2;
        let expected = [
            (base, if x == 0 { 0 } else { 127 }),
            (base + 1, if y == 0 { 0 } else { 127 }),
        ];
        for (message, (controller, value)) in out.iter().zip(expected) {
            prop_assert_eq!(*message, MidiMessage::ControlChange { channel: 0, controller, value });
        }
    }
}
