// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device directory: typed classification and scene grouping.
//!
//! A directory is built once per discovery run and treated as an
//! immutable snapshot; a re-discovery builds a new directory that the
//! manager swaps in atomically. Scene devices are additionally bucketed
//! into operator-configured groups by case-insensitive substring match
//! against the scene name; a scene joins every group that matches, or
//! the `"other"` bucket when none do.

use std::collections::HashMap;

use crate::device::{Device, DeviceKind};

/// Fallback bucket for scenes matching no configured group label.
pub const OTHER_GROUP: &str = "other";

/// Immutable snapshot of the classified device inventory.
///
/// # Name keying
///
/// Devices are keyed by display name, the lookup key the presentation
/// surface works with. Two devices sharing a name collapse to the later
/// one (last-write-wins); the collision is logged with both device ids.
///
/// # Examples
///
/// ```
/// use homecloud_lib::{Device, DeviceKind, Directory};
///
/// let devices = vec![
///     Device::new("1", "Desk Lamp", DeviceKind::Light),
///     Device::new("2", "Kitchen Evening", DeviceKind::Scene),
/// ];
/// let directory = Directory::build(&devices, &["kitchen".to_string()]);
///
/// assert_eq!(directory.lights().len(), 1);
/// assert!(directory.scene_group("kitchen").unwrap().contains_key("Kitchen Evening"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    switches: HashMap<String, Device>,
    lights: HashMap<String, Device>,
    climates: HashMap<String, Device>,
    scenes: HashMap<String, Device>,
    scene_groups: HashMap<String, HashMap<String, Device>>,
    /// Lower-cased group labels in registration order, `"other"` last.
    group_order: Vec<String>,
    unknown_count: usize,
}

impl Directory {
    /// Classifies a device inventory into a directory snapshot.
    ///
    /// One empty bucket is registered per distinct group label (lower-cased,
    /// in the order given) plus `"other"`; repeated labels and a literal
    /// `"other"` collapse into their first bucket. Devices with an unknown
    /// type are dropped and counted. O(devices × groups), fine at household
    /// scale.
    #[must_use]
    pub fn build(devices: &[Device], group_labels: &[String]) -> Self {
        let mut directory = Self::default();

        for label in group_labels {
            let label = label.to_lowercase();
            if label != OTHER_GROUP && !directory.group_order.contains(&label) {
                directory.group_order.push(label);
            }
        }
        directory.group_order.push(OTHER_GROUP.to_string());
        for label in &directory.group_order {
            directory.scene_groups.insert(label.clone(), HashMap::new());
        }

        for device in devices {
            match device.kind {
                DeviceKind::Switch => directory.insert(Bucket::Switches, device),
                DeviceKind::Light => directory.insert(Bucket::Lights, device),
                DeviceKind::Climate => directory.insert(Bucket::Climates, device),
                DeviceKind::Scene => {
                    directory.insert(Bucket::Scenes, device);
                    directory.group_scene(device);
                }
                DeviceKind::Unknown => {
                    tracing::debug!(id = %device.id, name = %device.name, "dropping device of unknown type");
                    directory.unknown_count += 1;
                }
            }
        }

        tracing::info!(
            switches = directory.switches.len(),
            lights = directory.lights.len(),
            scenes = directory.scenes.len(),
            scene_groups = directory.scene_groups.len(),
            climates = directory.climates.len(),
            unknown = directory.unknown_count,
            "built device directory"
        );

        directory
    }

    fn insert(&mut self, bucket: Bucket, device: &Device) {
        let map = match bucket {
            Bucket::Switches => &mut self.switches,
            Bucket::Lights => &mut self.lights,
            Bucket::Climates => &mut self.climates,
            Bucket::Scenes => &mut self.scenes,
        };
        if let Some(previous) = map.insert(device.name.clone(), device.clone()) {
            tracing::warn!(
                name = %device.name,
                kept = %device.id,
                replaced = %previous.id,
                "duplicate display name, keeping the later device"
            );
        }
    }

    /// Adds a scene to every group whose label appears in its name
    /// (case-insensitive). Membership is many-to-many by design; the
    /// `"other"` bucket participates in matching like any other label, and
    /// a scene matching no label at all lands in `"other"` only.
    fn group_scene(&mut self, device: &Device) {
        let name_lower = device.name.to_lowercase();
        let mut matched = false;

        for label in &self.group_order {
            if name_lower.contains(label.as_str()) {
                matched = true;
                if let Some(bucket) = self.scene_groups.get_mut(label) {
                    bucket.insert(device.name.clone(), device.clone());
                }
            }
        }

        if !matched
            && let Some(bucket) = self.scene_groups.get_mut(OTHER_GROUP)
        {
            bucket.insert(device.name.clone(), device.clone());
        }
    }

    /// Switch devices by display name.
    #[must_use]
    pub fn switches(&self) -> &HashMap<String, Device> {
        &self.switches
    }

    /// Light devices by display name.
    #[must_use]
    pub fn lights(&self) -> &HashMap<String, Device> {
        &self.lights
    }

    /// Climate devices by display name.
    #[must_use]
    pub fn climates(&self) -> &HashMap<String, Device> {
        &self.climates
    }

    /// All scene devices by display name, regardless of grouping.
    #[must_use]
    pub fn scenes(&self) -> &HashMap<String, Device> {
        &self.scenes
    }

    /// A single scene group bucket, by lower-cased label.
    #[must_use]
    pub fn scene_group(&self, label: &str) -> Option<&HashMap<String, Device>> {
        self.scene_groups.get(label)
    }

    /// Group labels in registration order, `"other"` last.
    #[must_use]
    pub fn group_labels(&self) -> &[String] {
        &self.group_order
    }

    /// Iterates scene group buckets in registration order, `"other"` last.
    ///
    /// Presentation layers rely on this order when rendering the scene
    /// section.
    pub fn iter_scene_groups(&self) -> impl Iterator<Item = (&str, &HashMap<String, Device>)> {
        self.group_order
            .iter()
            .filter_map(|label| Some((label.as_str(), self.scene_groups.get(label)?)))
    }

    /// Number of discovered devices dropped for having an unknown type.
    #[must_use]
    pub fn unknown_count(&self) -> usize {
        self.unknown_count
    }

    /// Total number of classified devices across all typed buckets.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.switches.len() + self.lights.len() + self.climates.len() + self.scenes.len()
    }
}

enum Bucket {
    Switches,
    Lights,
    Climates,
    Scenes,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn inventory() -> Vec<Device> {
        vec![
            Device::new("sw-1", "Hallway Plug", DeviceKind::Switch),
            Device::new("li-1", "Desk Lamp", DeviceKind::Light),
            Device::new("cl-1", "Bedroom Heater", DeviceKind::Climate),
            Device::new("sc-1", "Kitchen Evening Lights", DeviceKind::Scene),
            Device::new("sc-2", "Movie Night", DeviceKind::Scene),
            Device::new("ir-1", "IR Blaster", DeviceKind::Unknown),
        ]
    }

    #[test]
    fn classifies_by_type() {
        let directory = Directory::build(&inventory(), &labels(&["kitchen"]));

        assert_eq!(directory.switches().len(), 1);
        assert_eq!(directory.lights().len(), 1);
        assert_eq!(directory.climates().len(), 1);
        assert_eq!(directory.scenes().len(), 2);
        assert_eq!(directory.device_count(), 5);
    }

    #[test]
    fn unknown_devices_are_dropped_and_counted() {
        let directory = Directory::build(&inventory(), &[]);

        assert_eq!(directory.unknown_count(), 1);
        assert!(!directory.switches().contains_key("IR Blaster"));
        assert!(!directory.scenes().contains_key("IR Blaster"));
    }

    #[test]
    fn scene_matches_multiple_groups() {
        let directory = Directory::build(
            &[Device::new(
                "sc-1",
                "Kitchen Evening Lights",
                DeviceKind::Scene,
            )],
            &labels(&["kitchen", "evening"]),
        );

        let name = "Kitchen Evening Lights";
        assert!(directory.scene_group("kitchen").unwrap().contains_key(name));
        assert!(directory.scene_group("evening").unwrap().contains_key(name));
        assert!(directory.scenes().contains_key(name));
        assert!(!directory.scene_group(OTHER_GROUP).unwrap().contains_key(name));
    }

    #[test]
    fn unmatched_scene_falls_back_to_other_only() {
        let directory = Directory::build(
            &[Device::new("sc-1", "Foo", DeviceKind::Scene)],
            &labels(&["kitchen"]),
        );

        assert!(directory.scene_group("kitchen").unwrap().is_empty());
        assert!(directory.scene_group(OTHER_GROUP).unwrap().contains_key("Foo"));
    }

    #[test]
    fn other_participates_in_substring_matching() {
        // "Mother" contains "other", so the scene belongs to both the
        // configured group and the "other" bucket.
        let directory = Directory::build(
            &[Device::new("sc-1", "Kitchen Mother", DeviceKind::Scene)],
            &labels(&["kitchen"]),
        );

        let name = "Kitchen Mother";
        assert!(directory.scene_group("kitchen").unwrap().contains_key(name));
        assert!(directory.scene_group(OTHER_GROUP).unwrap().contains_key(name));
    }

    #[test]
    fn duplicate_labels_register_one_bucket() {
        let directory = Directory::build(
            &[Device::new("sc-1", "Kitchen sweep", DeviceKind::Scene)],
            &labels(&["Kitchen", "kitchen", "other", "Evening"]),
        );

        let order: Vec<&str> = directory.group_labels().iter().map(String::as_str).collect();
        assert_eq!(order, ["kitchen", "evening", "other"]);

        let iterated: Vec<&str> = directory.iter_scene_groups().map(|(label, _)| label).collect();
        assert_eq!(iterated, ["kitchen", "evening", "other"]);
        assert_eq!(directory.scene_group("kitchen").unwrap().len(), 1);
    }

    #[test]
    fn group_matching_is_case_insensitive() {
        let directory = Directory::build(
            &[Device::new("sc-1", "KITCHEN sweep", DeviceKind::Scene)],
            &labels(&["Kitchen"]),
        );

        assert!(
            directory
                .scene_group("kitchen")
                .unwrap()
                .contains_key("KITCHEN sweep")
        );
    }

    #[test]
    fn group_order_is_registration_order_with_other_last() {
        let directory = Directory::build(&[], &labels(&["Evening", "Kitchen", "Morning"]));

        let order: Vec<&str> = directory.group_labels().iter().map(String::as_str).collect();
        assert_eq!(order, ["evening", "kitchen", "morning", "other"]);

        let iterated: Vec<&str> = directory.iter_scene_groups().map(|(label, _)| label).collect();
        assert_eq!(iterated, ["evening", "kitchen", "morning", "other"]);
    }

    #[test]
    fn empty_labels_still_register_other() {
        let directory = Directory::build(
            &[Device::new("sc-1", "Foo", DeviceKind::Scene)],
            &[],
        );

        assert_eq!(directory.group_labels(), &[OTHER_GROUP.to_string()]);
        assert!(directory.scene_group(OTHER_GROUP).unwrap().contains_key("Foo"));
    }

    #[test]
    fn rebuild_is_idempotent() {
        let devices = inventory();
        let group_labels = labels(&["kitchen", "evening"]);

        let first = Directory::build(&devices, &group_labels);
        let second = Directory::build(&devices, &group_labels);

        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_names_are_last_write_wins() {
        let devices = vec![
            Device::new("sw-1", "Plug", DeviceKind::Switch),
            Device::new("sw-2", "Plug", DeviceKind::Switch),
        ];
        let directory = Directory::build(&devices, &[]);

        assert_eq!(directory.switches().len(), 1);
        assert_eq!(directory.switches()["Plug"].id, "sw-2");
    }

    #[test]
    fn scene_appears_once_in_scenes_even_when_in_many_groups() {
        let directory = Directory::build(
            &[Device::new("sc-1", "Kitchen Evening", DeviceKind::Scene)],
            &labels(&["kitchen", "evening"]),
        );

        assert_eq!(directory.scenes().len(), 1);
    }
}
