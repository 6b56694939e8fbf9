mod forgetting_properties;
