//! Example pod spec shown with each scenario.

const BASE_BLOCK: &str = concat!(
    "v1.PodSpec{\n",
    "    Containers: []v1.Container{\n",
    "        {\n",
    "            Name:  \"<containerName>\",\n",
    "            Image: \"<image>\",\n",
    "            Args:  []string{\"test-webserver\"},\n",
    "        },\n",
    "    },\n",
);

const INIT_CONTAINER_BLOCK: &str = concat!(
    "    InitContainers: []v1.Container{\n",
    "        {\n",
    "            Name:    \"<initContainerName>\",\n",
    "            Image:   \"image2\",\n",
    "            Command: []string{\"sh\", \"-c\", \"sleep 5s\"},\n",
    "        },\n",
    "    },\n",
);

const VOLUME_BLOCK: &str = concat!(
    "    Volumes: []v1.Volume{\n",
    "        {\n",
    "            Name: \"cm\",\n",
    "            VolumeSource: v1.VolumeSource{\n",
    "                ConfigMap: &v1.ConfigMapVolumeSource{\n",
    "                    LocalObjectReference: v1.LocalObjectReference{Name: \"does-not-exist\"},\n",
    "                },\n",
    "            },\n",
    "        },\n",
    "    },\n",
);

const CLOSING_LINE: &str = "}\n";

/// Builds the example pod spec for a scenario.
///
/// The base container is always present; the init container and volume
/// blocks are appended in that order when requested. The closing brace is
/// written last, so every combination is balanced.
pub fn synthesize_payload(has_init_container: bool, has_volume: bool) -> String {
    let mut spec = String::from(BASE_BLOCK);
    if has_init_container {
        spec.push_str(INIT_CONTAINER_BLOCK);
    }
    if has_volume {
        spec.push_str(VOLUME_BLOCK);
    }
    spec.push_str(CLOSING_LINE);
    spec
}
