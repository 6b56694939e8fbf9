mod classifier_properties;
mod fusion_properties;
